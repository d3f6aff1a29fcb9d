use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: UserId,
    pub username: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

/// Comment as written by its author, before an id and timestamp are assigned.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: UserId,
    pub username: String,
    pub text: String,
}

impl Comment {
    pub fn new(comment: NewComment) -> Self {
        Self {
            id: format!("c{}", uuid::Uuid::new_v4().simple()),
            user_id: comment.user_id,
            username: comment.username,
            text: comment.text,
            date: Utc::now(),
        }
    }
}
