use serde::{Deserialize, Serialize};
use super::badge::BadgeKind;

//role carried in the access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AccountRole { Administrator, User }
impl std::fmt::Display for AccountRole {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt,"{:?}", self)
    }
}

/// Badge a user chose to show next to their name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum PrimaryBadge {
    Official(BadgeKind),
    Custom(String),
}

//users
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uuid: String,
    pub username: String,

    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub primary_badge: Option<PrimaryBadge>,

    #[serde(default)]
    pub followers: Vec<String>,
    #[serde(default)]
    pub following: Vec<String>,

    #[serde(default)]
    pub created_at: i64,
}

impl User {
    pub fn new(uuid: &str, username: &str, created_at: i64) -> Self {
        Self {
            uuid: uuid.to_string(),
            username: username.to_string(),
            badges: Vec::new(),
            primary_badge: None,
            followers: Vec::new(),
            following: Vec::new(),
            created_at,
        }
    }

    pub fn has_badge(&self, badge: BadgeKind) -> bool {
        self.badges.iter().any(|held| held == badge.as_str())
    }

    pub fn is_following(&self, target_id: &str) -> bool {
        self.following.iter().any(|id| id == target_id)
    }
}
