use serde::Deserialize;
use crate::error::{AppError, AppResult};
use crate::model::{
    notification::{Notification, NotificationType},
    post::{PollOption, Post, VoteDirection, VoteOutcome},
};
use crate::store::Store;
use super::{badge::{self, Trigger}, notification};

pub const MIN_POLL_OPTIONS: usize = 2;
pub const MAX_POLL_OPTIONS: usize = 6;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPoll {
    pub options: Vec<String>,
    pub end_date: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub text: String,
    #[serde(default)]
    pub is_anonymous: bool,
    pub poll: Option<NewPoll>,
}

fn poll_options(poll: &NewPoll, now: i64) -> AppResult<Vec<PollOption>> {
    let options: Vec<&str> = poll.options.iter().map(|option| option.trim()).collect();

    if !(MIN_POLL_OPTIONS..=MAX_POLL_OPTIONS).contains(&options.len()) {
        return Err(AppError::InvalidArgument(format!(
            "a poll needs {} to {} options",
            MIN_POLL_OPTIONS, MAX_POLL_OPTIONS
        )));
    }
    if options.iter().any(|option| option.is_empty()) {
        return Err(AppError::InvalidArgument("poll options cannot be empty".to_string()));
    }
    if poll.end_date <= now {
        return Err(AppError::InvalidArgument("poll end date must be in the future".to_string()));
    }

    Ok(options.into_iter().map(PollOption::new).collect())
}

/// Publishes a post, or a poll when `input.poll` is set, then evaluates the
/// author's post badges.
pub async fn create_post(
    store: &dyn Store,
    author_id: &str,
    input: NewPost,
    now: i64,
) -> AppResult<Post> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(AppError::InvalidArgument("text is required".to_string()));
    }

    let author = store.find_user(author_id).await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    let mut post = Post::new(&uuid::Uuid::new_v4().to_string(), author_id, &author.username, text, now);
    post.is_anonymous = input.is_anonymous;

    if let Some(poll) = &input.poll {
        post.poll_options = poll_options(poll, now)?;
        post.poll_end_date = Some(poll.end_date);
        post.is_poll = true;
        post.poll_notified = false;
    }

    store.insert_post(&post).await?;
    badge::evaluate_and_grant(store, author_id, Trigger::PostCreated).await;

    Ok(post)
}

/// Up/down vote toggle. The score transition is handed to the badge
/// evaluator for the post's author.
pub async fn vote_post(
    store: &dyn Store,
    voter_id: &str,
    post_id: &str,
    direction: VoteDirection,
    now: i64,
) -> AppResult<VoteOutcome> {
    let voter = store.find_user(voter_id).await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    let outcome = store.apply_post_vote(post_id, voter_id, direction).await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    if outcome.newly_upvoted && outcome.author_id != voter_id {
        let notification = Notification::new(
            &outcome.author_id,
            NotificationType::Upvote,
            Some(post_id),
            format!("{} ha votato il tuo post.", voter.username),
            now,
        );
        notification::notify(store, &notification).await;
    }

    let trigger = Trigger::ScoreChanged {
        before: outcome.change.before,
        after: outcome.change.after,
    };
    badge::evaluate_and_grant(store, &outcome.author_id, trigger).await;

    Ok(outcome)
}
