//! # Poll closer
//!
//! Periodic pass over polls whose end date has passed. Each due poll is
//! closed in its own commit: the `pollNotified` flag and one `poll_end`
//! notification per distinct voter are written together, and the commit
//! re-checks the flag so a replayed or concurrent pass writes nothing.

use std::sync::Arc;
use std::time::Duration;
use crate::error::{AppError, AppResult};
use crate::model::{
    notification::{Notification, NotificationType},
    post::Post,
};
use crate::store::Store;
use crate::utils::{string::ellipsize, time::now_millis};

/// Characters of poll text quoted in the closing notification.
pub const CLOSING_TEXT_PREFIX: usize = 50;

pub fn closing_text(poll_text: &str) -> String {
    format!("Il sondaggio \"{}\" è terminato.", ellipsize(poll_text, CLOSING_TEXT_PREFIX))
}

/// One `poll_end` notification per distinct voter of `poll`.
pub fn closing_notifications(poll: &Post, now: i64) -> Vec<Notification> {
    let text = closing_text(&poll.text);
    poll.distinct_voters()
        .iter()
        .map(|voter| {
            Notification::new(voter, NotificationType::PollEnd, Some(poll.uuid.as_str()), text.clone(), now)
        })
        .collect()
}

/// Closes every poll due at `now` (inclusive). Returns how many polls this
/// call closed. A failed commit aborts the pass; polls committed before it
/// stay closed and the rest are picked up by the next pass.
pub async fn close_due_polls(store: &dyn Store, now: i64) -> AppResult<usize> {
    let due = store.find_due_polls(now).await?;
    if due.is_empty() {
        return Ok(0);
    }

    let mut closed = 0;
    for poll in due {
        let notifications = closing_notifications(&poll, now);
        let recipients = notifications.len();
        if store.close_poll(&poll.uuid, notifications).await? {
            log::info!("Closed poll {} and notified {} voters", poll.uuid, recipients);
            closed += 1;
        }
    }
    Ok(closed)
}

/// Runs [`close_due_polls`] every `period` until the task is dropped.
pub async fn run_scheduler(store: Arc<dyn Store>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        match close_due_polls(store.as_ref(), now_millis()).await {
            Ok(0) => {},
            Ok(closed) => log::info!("Poll closer closed {} polls", closed),
            Err(error) => log::error!("{:?}", error),
        }
    }
}

/// Toggles the caller's vote on one option of an open poll. Returns whether
/// the caller now holds a vote on that option.
pub async fn vote(
    store: &dyn Store,
    caller_id: &str,
    post_id: &str,
    option_index: usize,
    now: i64,
) -> AppResult<bool> {
    let poll = store.find_post(post_id).await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    if !poll.is_poll {
        return Err(AppError::FailedPrecondition("post is not a poll".to_string()));
    }
    if !poll.poll_is_open(now) {
        return Err(AppError::FailedPrecondition("poll has ended".to_string()));
    }
    if option_index >= poll.poll_options.len() {
        return Err(AppError::InvalidArgument("poll option out of range".to_string()));
    }

    store.toggle_poll_vote(post_id, caller_id, option_index).await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))
}
