//! # Store
//!
//! Persistence contract for every collection the service touches. Operations
//! that must succeed or fail together (poll closing, follow toggling, reposts,
//! custom-badge creation under the per-user cap) are single trait methods so
//! each implementation can commit them atomically.

use async_trait::async_trait;
use crate::error::StoreResult;
use crate::model::{
    account::{PrimaryBadge, User},
    badge::{BadgeKind, CustomBadge, CustomBadgeUpdate},
    comment::Comment,
    notification::Notification,
    post::{Post, VoteDirection, VoteOutcome},
};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

pub const USERS: &str = "users";
pub const POSTS: &str = "posts";
pub const COMMENTS: &str = "comments";
pub const NOTIFICATIONS: &str = "notifications";
pub const CUSTOM_BADGES: &str = "custom_badges";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    // Users

    /// Inserts a profile. Returns `false` when the username is already taken.
    async fn insert_user(&self, user: &User) -> StoreResult<bool>;
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>>;
    async fn find_user_id_by_username(&self, username: &str) -> StoreResult<Option<String>>;
    async fn list_user_ids(&self) -> StoreResult<Vec<String>>;
    /// Set-union write: `badges := badges ∪ {badge}`.
    async fn add_badge(&self, user_id: &str, badge: BadgeKind) -> StoreResult<()>;
    async fn set_primary_badge(&self, user_id: &str, badge: Option<PrimaryBadge>) -> StoreResult<()>;
    /// Clears the primary badge only if it still equals `badge`.
    async fn clear_primary_badge_if(&self, user_id: &str, badge: &PrimaryBadge) -> StoreResult<bool>;
    /// Updates both sides of a follow edge, plus the optional notification, as
    /// one unit. Returns `false`, writing nothing, when the edge is already in
    /// the requested state.
    async fn apply_follow(
        &self,
        follower_id: &str,
        target_id: &str,
        follow: bool,
        notification: Option<Notification>,
    ) -> StoreResult<bool>;

    // Posts

    async fn insert_post(&self, post: &Post) -> StoreResult<()>;
    async fn find_post(&self, post_id: &str) -> StoreResult<Option<Post>>;
    /// Counts authored posts, stopping at `cap` when given.
    async fn count_posts_by_author(&self, author_id: &str, cap: Option<u64>) -> StoreResult<u64>;
    async fn post_scores_by_author(&self, author_id: &str) -> StoreResult<Vec<i64>>;
    /// Returns `None` when the post does not exist.
    async fn apply_post_vote(
        &self,
        post_id: &str,
        user_id: &str,
        direction: VoteDirection,
    ) -> StoreResult<Option<VoteOutcome>>;
    /// Returns whether the user now holds a vote on the option, `None` when
    /// the post or option does not exist.
    async fn toggle_poll_vote(
        &self,
        post_id: &str,
        user_id: &str,
        option_index: usize,
    ) -> StoreResult<Option<bool>>;
    /// Inserts `repost` and records its author on the original. Returns
    /// `false`, writing nothing, if the author already reposted the original.
    async fn insert_repost(&self, repost: &Post, original_id: &str) -> StoreResult<bool>;
    /// Polls with `pollNotified == false` and `pollEndDate <= now`.
    async fn find_due_polls(&self, now: i64) -> StoreResult<Vec<Post>>;
    /// Sets `pollNotified` and inserts `notifications` in one commit. Returns
    /// `false`, writing nothing, if the poll was already notified.
    async fn close_poll(&self, poll_id: &str, notifications: Vec<Notification>) -> StoreResult<bool>;

    // Comments

    /// Inserts the comment and bumps the post's `commentsCount`. Returns
    /// `false` when the post does not exist.
    async fn insert_comment(&self, comment: &Comment) -> StoreResult<bool>;
    async fn find_comment(&self, comment_id: &str) -> StoreResult<Option<Comment>>;
    async fn count_comments_by_author(&self, author_id: &str, cap: Option<u64>) -> StoreResult<u64>;

    // Notifications

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()>;
    /// Newest first, one page at a time (pages start at 1).
    async fn notifications_for(
        &self,
        recipient_id: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> StoreResult<Vec<Notification>>;
    async fn mark_all_read(&self, recipient_id: &str) -> StoreResult<u64>;

    // Custom badges

    /// Inserts the badge unless the owner already holds `limit` of them.
    async fn insert_custom_badge(&self, badge: &CustomBadge, limit: u64) -> StoreResult<bool>;
    async fn find_custom_badge(&self, owner_id: &str, badge_id: &str) -> StoreResult<Option<CustomBadge>>;
    async fn list_custom_badges(&self, owner_id: &str) -> StoreResult<Vec<CustomBadge>>;
    async fn update_custom_badge(
        &self,
        owner_id: &str,
        badge_id: &str,
        update: &CustomBadgeUpdate,
    ) -> StoreResult<Option<CustomBadge>>;
    async fn delete_custom_badge(&self, owner_id: &str, badge_id: &str) -> StoreResult<bool>;
}
