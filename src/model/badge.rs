use serde::{Deserialize, Serialize};

/// Official badges. Granted by the badge evaluator only, never revoked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind { Pioneer, Chatterbox, Popular, King }

impl std::fmt::Display for BadgeKind {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{}", self.as_str())
    }
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 4] = [
        BadgeKind::Pioneer,
        BadgeKind::Chatterbox,
        BadgeKind::Popular,
        BadgeKind::King,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeKind::Pioneer => "pioneer",
            BadgeKind::Chatterbox => "chatterbox",
            BadgeKind::Popular => "popular",
            BadgeKind::King => "king",
        }
    }

    pub fn from_str(s: &str) -> Option<BadgeKind> {
        match s {
            "pioneer" => Some(BadgeKind::Pioneer),
            "chatterbox" => Some(BadgeKind::Chatterbox),
            "popular" => Some(BadgeKind::Popular),
            "king" => Some(BadgeKind::King),
            _ => None,
        }
    }

    pub fn info(&self) -> BadgeInfo {
        match self {
            BadgeKind::Pioneer => BadgeInfo {
                id: "pioneer",
                name: "Pioniere",
                description: "Ha pubblicato il suo primo post.",
                color: "#3498db",
            },
            BadgeKind::Chatterbox => BadgeInfo {
                id: "chatterbox",
                name: "Chiacchierone",
                description: "Ha scritto più di 50 commenti.",
                color: "#f1c40f",
            },
            BadgeKind::Popular => BadgeInfo {
                id: "popular",
                name: "Popolare",
                description: "Un suo post ha raggiunto 100 upvote.",
                color: "#e67e22",
            },
            BadgeKind::King => BadgeInfo {
                id: "king",
                name: "Re del Segreto",
                description: "Un suo post ha raggiunto 500 upvote.",
                color: "#e74c3c",
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

//custom_badges
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomBadge {
    pub uuid: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: i64,
}

/// Partial update of a custom badge; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomBadgeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
