use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    PollEnd,
    Follow,
    Repost,
    Comment,
    Reply,
    Upvote,
    Badge,
}
impl std::fmt::Display for NotificationType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt,"{:?}", self)
    }
}

//notifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub uuid: String,
    pub recipient_id: String,
    #[serde(rename = "type")]
    pub n_type: NotificationType,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub comment_id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub is_read: bool,
    pub timestamp: i64,
}

impl Notification {
    pub fn new(
        recipient_id: &str,
        n_type: NotificationType,
        post_id: Option<&str>,
        text: String,
        timestamp: i64,
    ) -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            recipient_id: recipient_id.to_string(),
            n_type,
            post_id: post_id.map(str::to_string),
            comment_id: None,
            text,
            is_read: false,
            timestamp,
        }
    }

    pub fn with_comment(mut self, comment_id: &str) -> Self {
        self.comment_id = Some(comment_id.to_string());
        self
    }
}
