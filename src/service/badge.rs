//! # Badge evaluator
//!
//! Official badges are additive: the evaluator only ever grants, and every
//! grant is guarded by a membership check so redundant triggers write nothing.
//!
//! Steady-state evaluation runs after the write that produced the activity
//! ([`Trigger`]). Failures here are logged and swallowed; the triggering write
//! has already succeeded and must stay that way.

use serde::Serialize;
use crate::error::{AppResult, StoreResult};
use crate::model::{
    account::User,
    badge::BadgeKind,
    notification::{Notification, NotificationType},
};
use crate::store::Store;
use crate::utils::time::now_millis;
use super::notification;

/// Authored comments needed for chatterbox. The sweep also uses it as the cap
/// of its counting query, which is only a valid "at least" test while the two
/// are the same number.
pub const CHATTERBOX_THRESHOLD: u64 = 50;
pub const POPULAR_THRESHOLD: i64 = 100;
pub const KING_THRESHOLD: i64 = 500;

/// Activity that may make a user newly qualify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    PostCreated,
    CommentCreated,
    ScoreChanged { before: i64, after: i64 },
}

/// `true` only on the transition into `threshold`, never on a later
/// observation of a score already at or above it.
pub fn crossed(before: i64, after: i64, threshold: i64) -> bool {
    before < threshold && threshold <= after
}

/// Badges the score transition earns, before checking what is already held.
pub fn score_badges(before: i64, after: i64) -> Vec<BadgeKind> {
    let mut earned = Vec::new();
    if crossed(before, after, POPULAR_THRESHOLD) {
        earned.push(BadgeKind::Popular);
    }
    if crossed(before, after, KING_THRESHOLD) {
        earned.push(BadgeKind::King);
    }
    earned
}

/// Evaluates `trigger` for `user_id` and grants what newly qualifies.
/// Returns the badges actually written. A missing user, or any store
/// failure, yields an empty list.
pub async fn evaluate_and_grant(store: &dyn Store, user_id: &str, trigger: Trigger) -> Vec<BadgeKind> {
    match evaluate(store, user_id, trigger).await {
        Ok(granted) => granted,
        Err(error) => {
            log::error!("{:?}", error);
            Vec::new()
        },
    }
}

async fn evaluate(store: &dyn Store, user_id: &str, trigger: Trigger) -> StoreResult<Vec<BadgeKind>> {
    let user = match store.find_user(user_id).await? {
        Some(user) => user,
        None => return Ok(Vec::new()),
    };

    let mut earned = Vec::new();
    match trigger {
        Trigger::PostCreated => {
            if !user.has_badge(BadgeKind::Pioneer)
                && store.count_posts_by_author(user_id, Some(1)).await? >= 1
            {
                earned.push(BadgeKind::Pioneer);
            }
        },
        Trigger::CommentCreated => {
            if !user.has_badge(BadgeKind::Chatterbox)
                && store.count_comments_by_author(user_id, None).await? >= CHATTERBOX_THRESHOLD
            {
                earned.push(BadgeKind::Chatterbox);
            }
        },
        Trigger::ScoreChanged { before, after } => {
            earned = score_badges(before, after);
        },
    }

    grant_all(store, &user, earned).await
}

async fn grant_all(store: &dyn Store, user: &User, earned: Vec<BadgeKind>) -> StoreResult<Vec<BadgeKind>> {
    let mut granted = Vec::new();
    for badge in earned {
        if user.has_badge(badge) {
            continue;
        }
        store.add_badge(&user.uuid, badge).await?;
        announce(store, &user.uuid, badge).await;
        granted.push(badge);
    }
    Ok(granted)
}

async fn announce(store: &dyn Store, user_id: &str, badge: BadgeKind) {
    let text = format!("Hai ottenuto il badge \"{}\"!", badge.info().name);
    let notification = Notification::new(user_id, NotificationType::Badge, None, text, now_millis());
    notification::notify(store, &notification).await;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub users_examined: u64,
    pub badges_granted: u64,
}

/// Re-derives every official badge for every user from the raw collections.
/// Safe to run any number of times; a user whose evaluation fails is logged
/// and skipped.
pub async fn reconcile_all_users(store: &dyn Store) -> AppResult<SweepSummary> {
    let user_ids = store.list_user_ids().await?;
    let mut summary = SweepSummary::default();

    for user_id in user_ids {
        summary.users_examined += 1;
        match reconcile_user(store, &user_id).await {
            Ok(granted) => summary.badges_granted += granted.len() as u64,
            Err(error) => log::error!("badge sweep failed for {}: {:?}", user_id, error),
        }
    }

    log::info!(
        "Badge sweep examined {} users, granted {} badges",
        summary.users_examined,
        summary.badges_granted
    );
    Ok(summary)
}

async fn reconcile_user(store: &dyn Store, user_id: &str) -> StoreResult<Vec<BadgeKind>> {
    let user = match store.find_user(user_id).await? {
        Some(user) => user,
        None => return Ok(Vec::new()),
    };

    let mut earned = Vec::new();

    if !user.has_badge(BadgeKind::Pioneer)
        && store.count_posts_by_author(user_id, Some(1)).await? >= 1
    {
        earned.push(BadgeKind::Pioneer);
    }

    if !user.has_badge(BadgeKind::Chatterbox) {
        let comments = store.count_comments_by_author(user_id, Some(CHATTERBOX_THRESHOLD)).await?;
        if comments >= CHATTERBOX_THRESHOLD {
            earned.push(BadgeKind::Chatterbox);
        }
    }

    let mut popular = user.has_badge(BadgeKind::Popular);
    let mut king = user.has_badge(BadgeKind::King);
    if !(popular && king) {
        for score in store.post_scores_by_author(user_id).await? {
            popular |= score >= POPULAR_THRESHOLD;
            king |= score >= KING_THRESHOLD;
            if popular && king {
                break;
            }
        }
        if popular {
            earned.push(BadgeKind::Popular);
        }
        if king {
            earned.push(BadgeKind::King);
        }
    }

    grant_all(store, &user, earned).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::model::{comment::Comment, post::Post};
    use crate::store::{MemoryStore, MockStore};

    fn user_with(badges: &[BadgeKind]) -> User {
        let mut user = User::new("u1", "anna", 0);
        user.badges = badges.iter().map(|badge| badge.as_str().to_string()).collect();
        user
    }

    fn post(uuid: &str, author_id: &str, score: i64) -> Post {
        let mut post = Post::new(uuid, author_id, author_id, "hello", 0);
        post.score = score;
        post
    }

    fn comment(uuid: &str, post_id: &str, author_id: &str) -> Comment {
        Comment {
            uuid: uuid.to_string(),
            post_id: post_id.to_string(),
            author_id: author_id.to_string(),
            author: author_id.to_string(),
            text: "ciao".to_string(),
            score: 0,
            parent_id: None,
            created_at: 0,
        }
    }

    #[test]
    fn crossing_is_edge_triggered() {
        assert!(crossed(99, 100, 100));
        assert!(crossed(50, 600, 100));
        assert!(!crossed(100, 120, 100));
        assert!(!crossed(120, 100, 100));
        assert_eq!(score_badges(450, 520), vec![BadgeKind::King]);
        assert_eq!(score_badges(0, 500), vec![BadgeKind::Popular, BadgeKind::King]);
    }

    #[tokio::test]
    async fn held_badge_is_not_written_again() {
        let mut store = MockStore::new();
        store
            .expect_find_user()
            .returning(|_| Ok(Some(user_with(&[BadgeKind::Popular]))));
        store.expect_add_badge().times(0);
        store.expect_insert_notification().times(0);

        let granted = evaluate_and_grant(
            &store,
            "u1",
            Trigger::ScoreChanged { before: 99, after: 100 },
        ).await;
        assert!(granted.is_empty());
    }

    #[tokio::test]
    async fn popular_granted_once_across_score_sequences() {
        let store = MemoryStore::new();
        store.insert_user(&User::new("u1", "anna", 0)).await.unwrap();

        let mut grants = Vec::new();
        for sequence in [[50, 90, 100, 120], [100, 100, 50, 100]] {
            for pair in sequence.windows(2) {
                let trigger = Trigger::ScoreChanged { before: pair[0], after: pair[1] };
                grants.push((pair[0], pair[1], evaluate_and_grant(&store, "u1", trigger).await));
            }
        }

        let popular: Vec<(i64, i64)> = grants
            .iter()
            .filter(|(_, _, granted)| granted.contains(&BadgeKind::Popular))
            .map(|(before, after, _)| (*before, *after))
            .collect();
        assert_eq!(popular, vec![(90, 100)]);

        let user = store.find_user("u1").await.unwrap().unwrap();
        assert_eq!(user.badges, vec!["popular".to_string()]);
    }

    #[tokio::test]
    async fn missing_user_is_a_silent_no_op() {
        let mut store = MockStore::new();
        store.expect_find_user().returning(|_| Ok(None));
        store.expect_add_badge().times(0);

        assert!(evaluate_and_grant(&store, "ghost", Trigger::PostCreated).await.is_empty());
    }

    #[tokio::test]
    async fn store_failures_are_swallowed() {
        let mut store = MockStore::new();
        store.expect_find_user().returning(|_| Ok(Some(user_with(&[]))));
        store.expect_count_posts_by_author().returning(|_, _| Ok(1));
        store
            .expect_add_badge()
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("down".into())));

        assert!(evaluate_and_grant(&store, "u1", Trigger::PostCreated).await.is_empty());
    }

    #[tokio::test]
    async fn pioneer_on_first_post_with_notification() {
        let store = MemoryStore::new();
        store.insert_user(&User::new("u1", "anna", 0)).await.unwrap();
        store.insert_post(&post("p1", "u1", 0)).await.unwrap();

        let granted = evaluate_and_grant(&store, "u1", Trigger::PostCreated).await;
        assert_eq!(granted, vec![BadgeKind::Pioneer]);

        let notifications = store.notifications_for("u1", None, None).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].n_type, NotificationType::Badge);
        assert!(notifications[0].text.contains("Pioniere"));

        assert!(evaluate_and_grant(&store, "u1", Trigger::PostCreated).await.is_empty());
    }

    #[tokio::test]
    async fn chatterbox_needs_fifty_comments() {
        let store = MemoryStore::new();
        store.insert_user(&User::new("u1", "anna", 0)).await.unwrap();
        store.insert_post(&post("p1", "u2", 0)).await.unwrap();

        for index in 0..49 {
            store.insert_comment(&comment(&format!("c{}", index), "p1", "u1")).await.unwrap();
        }
        assert!(evaluate_and_grant(&store, "u1", Trigger::CommentCreated).await.is_empty());

        store.insert_comment(&comment("c49", "p1", "u1")).await.unwrap();
        assert_eq!(
            evaluate_and_grant(&store, "u1", Trigger::CommentCreated).await,
            vec![BadgeKind::Chatterbox]
        );
    }

    #[tokio::test]
    async fn sweep_converges() {
        let store = MemoryStore::new();
        store.insert_user(&User::new("u1", "anna", 0)).await.unwrap();
        store.insert_user(&User::new("u2", "bruno", 0)).await.unwrap();
        store.insert_user(&User::new("u3", "carla", 0)).await.unwrap();
        store.insert_post(&post("p1", "u1", 120)).await.unwrap();
        store.insert_post(&post("p2", "u1", 600)).await.unwrap();
        store.insert_post(&post("p3", "u2", 3)).await.unwrap();
        for index in 0..50 {
            store.insert_comment(&comment(&format!("c{}", index), "p3", "u2")).await.unwrap();
        }

        let first = reconcile_all_users(&store).await.unwrap();
        assert_eq!(first, SweepSummary { users_examined: 3, badges_granted: 5 });

        let second = reconcile_all_users(&store).await.unwrap();
        assert_eq!(second, SweepSummary { users_examined: 3, badges_granted: 0 });

        let u1 = store.find_user("u1").await.unwrap().unwrap();
        assert!(u1.has_badge(BadgeKind::Pioneer));
        assert!(u1.has_badge(BadgeKind::Popular));
        assert!(u1.has_badge(BadgeKind::King));
        let u2 = store.find_user("u2").await.unwrap().unwrap();
        assert!(u2.has_badge(BadgeKind::Chatterbox));
        assert!(!u2.has_badge(BadgeKind::Popular));
    }

    #[tokio::test]
    async fn sweep_continues_past_a_failing_user() {
        let mut store = MockStore::new();
        store
            .expect_list_user_ids()
            .returning(|| Ok(vec!["bad".to_string(), "good".to_string()]));
        store.expect_find_user().returning(|user_id| {
            if user_id == "bad" {
                Err(StoreError::Unavailable("down".into()))
            }
            else {
                let mut user = User::new("good", "good", 0);
                user.badges = BadgeKind::ALL.iter().map(|badge| badge.as_str().to_string()).collect();
                Ok(Some(user))
            }
        });

        let summary = reconcile_all_users(&store).await.unwrap();
        assert_eq!(summary, SweepSummary { users_examined: 2, badges_granted: 0 });
    }
}
