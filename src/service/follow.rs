use serde::Serialize;
use crate::error::{AppError, AppResult};
use crate::model::notification::{Notification, NotificationType};
use crate::store::Store;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FollowState { Followed, Unfollowed }

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FollowOutcome {
    pub success: bool,
    pub new_state: FollowState,
}

/// Follows `target_id` if the caller does not follow it yet, unfollows it
/// otherwise. Both sides of the edge, and the notification sent on a follow,
/// are committed together.
pub async fn toggle(
    store: &dyn Store,
    caller_id: &str,
    target_id: Option<&str>,
    now: i64,
) -> AppResult<FollowOutcome> {
    let target_id = target_id
        .filter(|target_id| !target_id.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("target user id is required".to_string()))?;

    if target_id == caller_id {
        return Err(AppError::InvalidArgument("you cannot follow yourself".to_string()));
    }

    let caller = store.find_user(caller_id).await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    if store.find_user(target_id).await?.is_none() {
        return Err(AppError::NotFound("user not found".to_string()));
    }

    let follow = !caller.is_following(target_id);
    let notification = match follow {
        true => Some(Notification::new(
            target_id,
            NotificationType::Follow,
            None,
            format!("{} ha iniziato a seguirti.", caller.username),
            now,
        )),
        false => None,
    };

    if !store.apply_follow(caller_id, target_id, follow, notification).await? {
        log::info!("Follow edge {} -> {} already settled by a concurrent request", caller_id, target_id);
    }

    Ok(FollowOutcome {
        success: true,
        new_state: if follow { FollowState::Followed } else { FollowState::Unfollowed },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::model::account::User;
    use crate::store::{MemoryStore, MockStore};

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_user(&User::new("u1", "anna", 0)).await.unwrap();
        store.insert_user(&User::new("u2", "bruno", 0)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn toggles_both_sides() {
        let store = seeded().await;

        let outcome = toggle(&store, "u1", Some("u2"), 0).await.unwrap();
        assert_eq!(outcome.new_state, FollowState::Followed);
        assert_eq!(store.find_user("u1").await.unwrap().unwrap().following, vec!["u2"]);
        assert_eq!(store.find_user("u2").await.unwrap().unwrap().followers, vec!["u1"]);

        let notifications = store.notifications_for("u2", None, None).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].n_type, NotificationType::Follow);

        let outcome = toggle(&store, "u1", Some("u2"), 0).await.unwrap();
        assert_eq!(outcome.new_state, FollowState::Unfollowed);
        assert!(store.find_user("u1").await.unwrap().unwrap().following.is_empty());
        assert!(store.find_user("u2").await.unwrap().unwrap().followers.is_empty());
        assert_eq!(store.notifications_for("u2", None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_missing_and_self_targets() {
        let store = seeded().await;
        assert!(matches!(toggle(&store, "u1", None, 0).await, Err(AppError::InvalidArgument(_))));
        assert!(matches!(toggle(&store, "u1", Some(""), 0).await, Err(AppError::InvalidArgument(_))));
        assert!(matches!(toggle(&store, "u1", Some("u1"), 0).await, Err(AppError::InvalidArgument(_))));
        assert!(matches!(toggle(&store, "u1", Some("ghost"), 0).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn racing_follows_notify_once() {
        let store = seeded().await;
        let stale = store.find_user("u1").await.unwrap().unwrap();
        assert!(!stale.is_following("u2"));

        let first = Notification::new("u2", NotificationType::Follow, None, "anna".into(), 0);
        let second = first.clone();
        assert!(store.apply_follow("u1", "u2", true, Some(first)).await.unwrap());
        assert!(!store.apply_follow("u1", "u2", true, Some(second)).await.unwrap());

        assert_eq!(store.find_user("u2").await.unwrap().unwrap().followers, vec!["u1"]);
        assert_eq!(store.notifications_for("u2", None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn commit_failure_propagates() {
        let mut store = MockStore::new();
        store
            .expect_find_user()
            .returning(|user_id| Ok(Some(User::new(user_id, user_id, 0))));
        store
            .expect_apply_follow()
            .times(1)
            .returning(|_, _, _, _| Err(StoreError::Unavailable("down".into())));

        assert!(matches!(toggle(&store, "u1", Some("u2"), 0).await, Err(AppError::Internal(_))));
    }
}
