//! In-process [`Store`] used by tests and by `DATABASE_BACKEND=memory`.
//!
//! Every operation takes the single state lock, so multi-document operations
//! are atomic exactly like their transactional MongoDB counterparts.

use std::collections::BTreeMap;
use async_trait::async_trait;
use tokio::sync::Mutex;
use crate::error::StoreResult;
use crate::model::{
    account::{PrimaryBadge, User},
    badge::{BadgeKind, CustomBadge, CustomBadgeUpdate},
    comment::Comment,
    notification::Notification,
    post::{self, Post, VoteDirection, VoteOutcome},
};
use crate::utils::mongo::page_slice;
use super::Store;

#[derive(Default)]
struct State {
    users: BTreeMap<String, User>,
    posts: BTreeMap<String, Post>,
    comments: Vec<Comment>,
    notifications: Vec<Notification>,
    custom_badges: Vec<CustomBadge>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn capped(count: usize, cap: Option<u64>) -> u64 {
    let count = count as u64;
    match cap {
        Some(cap) => count.min(cap),
        None => count,
    }
}

fn add_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|item| item == value) {
        list.push(value.to_string());
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let taken = state.users.values().any(|existing| {
            existing.username == user.username || existing.uuid == user.uuid
        });
        if taken {
            return Ok(false);
        }
        state.users.insert(user.uuid.clone(), user.clone());
        Ok(true)
    }

    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.state.lock().await.users.get(user_id).cloned())
    }

    async fn find_user_id_by_username(&self, username: &str) -> StoreResult<Option<String>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|user| user.username == username).map(|user| user.uuid.clone()))
    }

    async fn list_user_ids(&self) -> StoreResult<Vec<String>> {
        Ok(self.state.lock().await.users.keys().cloned().collect())
    }

    async fn add_badge(&self, user_id: &str, badge: BadgeKind) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(user_id) {
            add_unique(&mut user.badges, badge.as_str());
        }
        Ok(())
    }

    async fn set_primary_badge(&self, user_id: &str, badge: Option<PrimaryBadge>) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(user_id) {
            user.primary_badge = badge;
        }
        Ok(())
    }

    async fn clear_primary_badge_if(&self, user_id: &str, badge: &PrimaryBadge) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.users.get_mut(user_id) {
            Some(user) if user.primary_badge.as_ref() == Some(badge) => {
                user.primary_badge = None;
                Ok(true)
            },
            _ => Ok(false),
        }
    }

    async fn apply_follow(
        &self,
        follower_id: &str,
        target_id: &str,
        follow: bool,
        notification: Option<Notification>,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let Some(follower) = state.users.get_mut(follower_id) else {
            return Ok(false);
        };
        if follower.is_following(target_id) == follow {
            return Ok(false);
        }
        if follow {
            add_unique(&mut follower.following, target_id);
        }
        else {
            follower.following.retain(|id| id != target_id);
        }
        if let Some(target) = state.users.get_mut(target_id) {
            if follow {
                add_unique(&mut target.followers, follower_id);
            }
            else {
                target.followers.retain(|id| id != follower_id);
            }
        }
        if let Some(notification) = notification {
            state.notifications.push(notification);
        }
        Ok(true)
    }

    async fn insert_post(&self, post: &Post) -> StoreResult<()> {
        self.state.lock().await.posts.insert(post.uuid.clone(), post.clone());
        Ok(())
    }

    async fn find_post(&self, post_id: &str) -> StoreResult<Option<Post>> {
        Ok(self.state.lock().await.posts.get(post_id).cloned())
    }

    async fn count_posts_by_author(&self, author_id: &str, cap: Option<u64>) -> StoreResult<u64> {
        let state = self.state.lock().await;
        let count = state.posts.values().filter(|post| post.author_id == author_id).count();
        Ok(capped(count, cap))
    }

    async fn post_scores_by_author(&self, author_id: &str) -> StoreResult<Vec<i64>> {
        let state = self.state.lock().await;
        Ok(state.posts.values().filter(|post| post.author_id == author_id).map(|post| post.score).collect())
    }

    async fn apply_post_vote(
        &self,
        post_id: &str,
        user_id: &str,
        direction: VoteDirection,
    ) -> StoreResult<Option<VoteOutcome>> {
        let mut state = self.state.lock().await;
        Ok(state.posts.get_mut(post_id).map(|post| post::apply_vote(post, user_id, direction)))
    }

    async fn toggle_poll_vote(
        &self,
        post_id: &str,
        user_id: &str,
        option_index: usize,
    ) -> StoreResult<Option<bool>> {
        let mut state = self.state.lock().await;
        Ok(state.posts.get_mut(post_id).and_then(|post| post::toggle_poll_vote(post, user_id, option_index)))
    }

    async fn insert_repost(&self, repost: &Post, original_id: &str) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let original = match state.posts.get_mut(original_id) {
            Some(original) => original,
            None => return Ok(false),
        };
        if original.is_reposted_by(&repost.author_id) {
            return Ok(false);
        }
        original.reposted_by.push(repost.author_id.clone());
        original.reposts_count += 1;
        state.posts.insert(repost.uuid.clone(), repost.clone());
        Ok(true)
    }

    async fn find_due_polls(&self, now: i64) -> StoreResult<Vec<Post>> {
        let state = self.state.lock().await;
        Ok(state.posts
            .values()
            .filter(|post| {
                post.is_poll
                    && !post.poll_notified
                    && post.poll_end_date.map_or(false, |end| end <= now)
            })
            .cloned()
            .collect())
    }

    async fn close_poll(&self, poll_id: &str, notifications: Vec<Notification>) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.posts.get_mut(poll_id) {
            Some(poll) if !poll.poll_notified => poll.poll_notified = true,
            _ => return Ok(false),
        }
        state.notifications.extend(notifications);
        Ok(true)
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.posts.get_mut(&comment.post_id) {
            Some(post) => post.comments_count += 1,
            None => return Ok(false),
        }
        state.comments.push(comment.clone());
        Ok(true)
    }

    async fn find_comment(&self, comment_id: &str) -> StoreResult<Option<Comment>> {
        let state = self.state.lock().await;
        Ok(state.comments.iter().find(|comment| comment.uuid == comment_id).cloned())
    }

    async fn count_comments_by_author(&self, author_id: &str, cap: Option<u64>) -> StoreResult<u64> {
        let state = self.state.lock().await;
        let count = state.comments.iter().filter(|comment| comment.author_id == author_id).count();
        Ok(capped(count, cap))
    }

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        self.state.lock().await.notifications.push(notification.clone());
        Ok(())
    }

    async fn notifications_for(
        &self,
        recipient_id: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> StoreResult<Vec<Notification>> {
        let state = self.state.lock().await;
        let mut notifications: Vec<Notification> = state.notifications
            .iter()
            .filter(|notification| notification.recipient_id == recipient_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(page_slice(&notifications, limit, page))
    }

    async fn mark_all_read(&self, recipient_id: &str) -> StoreResult<u64> {
        let mut state = self.state.lock().await;
        let mut updated = 0;
        for notification in state.notifications.iter_mut() {
            if notification.recipient_id == recipient_id && !notification.is_read {
                notification.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn insert_custom_badge(&self, badge: &CustomBadge, limit: u64) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let held = state.custom_badges.iter().filter(|held| held.owner_id == badge.owner_id).count();
        if held as u64 >= limit {
            return Ok(false);
        }
        state.custom_badges.push(badge.clone());
        Ok(true)
    }

    async fn find_custom_badge(&self, owner_id: &str, badge_id: &str) -> StoreResult<Option<CustomBadge>> {
        let state = self.state.lock().await;
        Ok(state.custom_badges
            .iter()
            .find(|badge| badge.owner_id == owner_id && badge.uuid == badge_id)
            .cloned())
    }

    async fn list_custom_badges(&self, owner_id: &str) -> StoreResult<Vec<CustomBadge>> {
        let state = self.state.lock().await;
        Ok(state.custom_badges.iter().filter(|badge| badge.owner_id == owner_id).cloned().collect())
    }

    async fn update_custom_badge(
        &self,
        owner_id: &str,
        badge_id: &str,
        update: &CustomBadgeUpdate,
    ) -> StoreResult<Option<CustomBadge>> {
        let mut state = self.state.lock().await;
        let badge = state.custom_badges
            .iter_mut()
            .find(|badge| badge.owner_id == owner_id && badge.uuid == badge_id);

        Ok(badge.map(|badge| {
            if let Some(name) = &update.name {
                badge.name = name.clone();
            }
            if let Some(description) = &update.description {
                badge.description = description.clone();
            }
            if let Some(image_url) = &update.image_url {
                badge.image_url = Some(image_url.clone());
            }
            badge.clone()
        }))
    }

    async fn delete_custom_badge(&self, owner_id: &str, badge_id: &str) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.custom_badges.len();
        state.custom_badges.retain(|badge| !(badge.owner_id == owner_id && badge.uuid == badge_id));
        Ok(state.custom_badges.len() < before)
    }
}
