use serde::{Deserialize, Serialize};

//comments
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub uuid: String,
    pub post_id: String,
    pub author_id: String,
    pub author: String,
    pub text: String,

    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub parent_id: Option<String>,

    pub created_at: i64,
}
