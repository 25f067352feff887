use crate::error::{AppError, AppResult};
use crate::model::{
    account::User,
    notification::{Notification, NotificationType},
    post::Post,
};
use crate::store::Store;
use super::{badge::{self, Trigger}, notification};

/// New post pointing at `original`. Only the text and the anonymity flag
/// carry over; votes, comments, reposts and poll state start empty.
pub fn build_repost(original: &Post, reposter: &User, uuid: String, now: i64) -> Post {
    Post {
        uuid,
        author_id: reposter.uuid.clone(),
        author: reposter.username.clone(),
        text: original.text.clone(),
        score: 0,
        upvoted_by: Vec::new(),
        downvoted_by: Vec::new(),
        comments_count: 0,
        is_anonymous: original.is_anonymous,
        is_poll: false,
        poll_options: Vec::new(),
        poll_end_date: None,
        poll_notified: false,
        is_repost: true,
        original_post_id: Some(original.uuid.clone()),
        original_author_id: Some(original.author_id.clone()),
        original_author: Some(original.author.clone()),
        reposts_count: 0,
        reposted_by: Vec::new(),
        created_at: now,
    }
}

/// Reposts `original_id` as the caller. Returns the new post's uuid.
pub async fn repost(
    store: &dyn Store,
    caller_id: &str,
    original_id: Option<&str>,
    now: i64,
) -> AppResult<String> {
    let original_id = original_id
        .filter(|original_id| !original_id.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("post id is required".to_string()))?;

    let original = store.find_post(original_id).await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    if original.is_repost {
        return Err(AppError::FailedPrecondition("a repost cannot be reposted".to_string()));
    }
    if original.author_id == caller_id {
        return Err(AppError::FailedPrecondition("you cannot repost your own post".to_string()));
    }
    if original.is_reposted_by(caller_id) {
        return Err(AppError::AlreadyExists("post already reposted".to_string()));
    }

    let reposter = store.find_user(caller_id).await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    let repost = build_repost(&original, &reposter, uuid::Uuid::new_v4().to_string(), now);
    if !store.insert_repost(&repost, &original.uuid).await? {
        return Err(AppError::AlreadyExists("post already reposted".to_string()));
    }

    let notification = Notification::new(
        &original.author_id,
        NotificationType::Repost,
        Some(repost.uuid.as_str()),
        format!("{} ha ricondiviso il tuo post.", reposter.username),
        now,
    );
    notification::notify(store, &notification).await;
    badge::evaluate_and_grant(store, caller_id, Trigger::PostCreated).await;

    Ok(repost.uuid)
}
