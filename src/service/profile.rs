use serde::Serialize;
use crate::error::{AppError, AppResult};
use crate::model::{
    account::User,
    badge::{BadgeInfo, BadgeKind, CustomBadge},
};
use crate::store::Store;
use crate::utils::string::is_valid_username;

/// Public view of a user, with official badges expanded from the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: User,
    pub badge_details: Vec<BadgeInfo>,
    pub custom_badges: Vec<CustomBadge>,
    pub followers_count: usize,
    pub following_count: usize,
}

/// Creates the caller's profile. The caller id comes from the access token.
pub async fn create(store: &dyn Store, caller_id: &str, username: &str, now: i64) -> AppResult<User> {
    let username = username.trim();
    if !is_valid_username(username) {
        return Err(AppError::InvalidArgument(
            "username must be 3 to 20 letters, digits or underscores".to_string(),
        ));
    }

    if store.find_user(caller_id).await?.is_some() {
        return Err(AppError::AlreadyExists("profile already exists".to_string()));
    }

    let user = User::new(caller_id, username, now);
    if !store.insert_user(&user).await? {
        return Err(AppError::AlreadyExists("username already taken".to_string()));
    }

    log::info!("Created profile {} for {}", user.username, user.uuid);
    Ok(user)
}

pub async fn get(store: &dyn Store, user_id: &str) -> AppResult<ProfileView> {
    let user = store.find_user(user_id).await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let custom_badges = store.list_custom_badges(user_id).await?;
    let badge_details = user.badges
        .iter()
        .filter_map(|badge| BadgeKind::from_str(badge))
        .map(|badge| badge.info())
        .collect();

    Ok(ProfileView {
        followers_count: user.followers.len(),
        following_count: user.following.len(),
        badge_details,
        custom_badges,
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn usernames_are_validated_and_unique() {
        let store = MemoryStore::new();
        create(&store, "u1", "anna", 0).await.unwrap();

        assert!(matches!(create(&store, "u2", "a!", 0).await, Err(AppError::InvalidArgument(_))));
        assert!(matches!(create(&store, "u2", "anna", 0).await, Err(AppError::AlreadyExists(_))));
        assert!(matches!(create(&store, "u1", "anna_due", 0).await, Err(AppError::AlreadyExists(_))));
        create(&store, "u2", "bruno", 0).await.unwrap();
    }

    #[tokio::test]
    async fn profile_expands_badges_and_counts() {
        let store = MemoryStore::new();
        create(&store, "u1", "anna", 0).await.unwrap();
        store.add_badge("u1", BadgeKind::King).await.unwrap();

        let view = get(&store, "u1").await.unwrap();
        assert_eq!(view.badge_details.len(), 1);
        assert_eq!(view.badge_details[0].name, "Re del Segreto");
        assert_eq!(view.followers_count, 0);
        assert!(matches!(get(&store, "ghost").await, Err(AppError::NotFound(_))));
    }
}
