//! User-made badges and the primary-badge selection.

use serde::Deserialize;
use crate::builtins::media::MediaStorage;
use crate::error::{AppError, AppResult};
use crate::model::{
    account::PrimaryBadge,
    badge::{CustomBadge, CustomBadgeUpdate},
};
use crate::store::Store;

pub const MAX_CUSTOM_BADGES: u64 = 6;
pub const MAX_NAME_CHARS: usize = 30;
pub const MAX_DESCRIPTION_CHARS: usize = 120;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomBadge {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
}

fn check_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    let length = name.chars().count();
    if length == 0 || length > MAX_NAME_CHARS {
        return Err(AppError::InvalidArgument(format!(
            "badge name must be 1 to {} characters",
            MAX_NAME_CHARS
        )));
    }
    Ok(name.to_string())
}

fn check_description(description: &str) -> AppResult<String> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(AppError::InvalidArgument(format!(
            "badge description must be at most {} characters",
            MAX_DESCRIPTION_CHARS
        )));
    }
    Ok(description.to_string())
}

fn image_prefix(owner_id: &str) -> String {
    format!("badges/{}/", owner_id)
}

/// Badge images live under `badges/<ownerId>/`. Any other reference is
/// rejected so removals can never reach another user's files.
fn owns_image(owner_id: &str, image_url: &str) -> bool {
    let image_url = image_url.trim_start_matches('/');
    match image_url.strip_prefix(&image_prefix(owner_id)) {
        Some(file) => file
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != ".."),
        None => false,
    }
}

fn check_image_url(owner_id: &str, image_url: &str) -> AppResult<String> {
    if !owns_image(owner_id, image_url) {
        return Err(AppError::InvalidArgument(format!(
            "badge image must be stored under {}",
            image_prefix(owner_id)
        )));
    }
    Ok(image_url.trim_start_matches('/').to_string())
}

async fn remove_image(media: &dyn MediaStorage, owner_id: &str, image_url: &str) {
    if !owns_image(owner_id, image_url) {
        log::warn!("Refusing to remove {} on behalf of {}", image_url, owner_id);
        return;
    }
    if let Err(error) = media.remove(image_url).await {
        log::error!("failed to remove badge image {}: {:?}", image_url, error);
    }
}

/// Creates a badge for `owner_id`. The per-owner limit is checked in the same
/// commit as the insert, so concurrent creations cannot overshoot it.
pub async fn create(
    store: &dyn Store,
    owner_id: &str,
    input: NewCustomBadge,
    now: i64,
) -> AppResult<CustomBadge> {
    let badge = CustomBadge {
        uuid: uuid::Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        name: check_name(&input.name)?,
        description: check_description(&input.description)?,
        image_url: input.image_url
            .filter(|url| !url.is_empty())
            .map(|url| check_image_url(owner_id, &url))
            .transpose()?,
        created_at: now,
    };

    if store.find_user(owner_id).await?.is_none() {
        return Err(AppError::NotFound("profile not found".to_string()));
    }

    if !store.insert_custom_badge(&badge, MAX_CUSTOM_BADGES).await? {
        return Err(AppError::ResourceExhausted(format!(
            "you can have at most {} custom badges",
            MAX_CUSTOM_BADGES
        )));
    }
    Ok(badge)
}

/// Patches the given fields. A replaced image is removed from storage,
/// best-effort.
pub async fn update(
    store: &dyn Store,
    media: &dyn MediaStorage,
    owner_id: &str,
    badge_id: &str,
    patch: CustomBadgeUpdate,
) -> AppResult<CustomBadge> {
    let patch = CustomBadgeUpdate {
        name: patch.name.as_deref().map(check_name).transpose()?,
        description: patch.description.as_deref().map(check_description).transpose()?,
        image_url: patch.image_url
            .as_deref()
            .map(|url| check_image_url(owner_id, url))
            .transpose()?,
    };

    let previous = store.find_custom_badge(owner_id, badge_id).await?
        .ok_or_else(|| AppError::NotFound("badge not found".to_string()))?;

    let badge = store.update_custom_badge(owner_id, badge_id, &patch).await?
        .ok_or_else(|| AppError::NotFound("badge not found".to_string()))?;

    if let Some(old_image) = &previous.image_url {
        if badge.image_url.as_ref() != Some(old_image) {
            remove_image(media, owner_id, old_image).await;
        }
    }
    Ok(badge)
}

/// Deletes the badge and clears the owner's primary badge if it pointed at
/// it. Removing the stored image is best-effort.
pub async fn delete(
    store: &dyn Store,
    media: &dyn MediaStorage,
    owner_id: &str,
    badge_id: &str,
) -> AppResult<()> {
    let badge = store.find_custom_badge(owner_id, badge_id).await?
        .ok_or_else(|| AppError::NotFound("badge not found".to_string()))?;

    if !store.delete_custom_badge(owner_id, badge_id).await? {
        return Err(AppError::NotFound("badge not found".to_string()));
    }

    let selection = PrimaryBadge::Custom(badge.uuid.clone());
    if store.clear_primary_badge_if(owner_id, &selection).await? {
        log::info!("Cleared primary badge of {} after deleting {}", owner_id, badge.uuid);
    }

    if let Some(image_url) = &badge.image_url {
        remove_image(media, owner_id, image_url).await;
    }
    Ok(())
}

pub async fn list(store: &dyn Store, owner_id: &str) -> AppResult<Vec<CustomBadge>> {
    Ok(store.list_custom_badges(owner_id).await?)
}

/// Sets or, with `None`, clears the badge shown next to the owner's name.
pub async fn set_primary(
    store: &dyn Store,
    owner_id: &str,
    selection: Option<PrimaryBadge>,
) -> AppResult<Option<PrimaryBadge>> {
    let user = store.find_user(owner_id).await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    match &selection {
        Some(PrimaryBadge::Official(kind)) if !user.has_badge(*kind) => {
            return Err(AppError::FailedPrecondition(format!("badge {} not earned", kind)));
        },
        Some(PrimaryBadge::Custom(badge_id)) => {
            if store.find_custom_badge(owner_id, badge_id).await?.is_none() {
                return Err(AppError::NotFound("badge not found".to_string()));
            }
        },
        _ => {},
    }

    store.set_primary_badge(owner_id, selection.clone()).await?;
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::media::MockMediaStorage;
    use crate::model::{account::User, badge::BadgeKind};
    use crate::store::MemoryStore;

    fn input(name: &str, image_url: Option<&str>) -> NewCustomBadge {
        NewCustomBadge {
            name: name.to_string(),
            description: "fatto a mano".to_string(),
            image_url: image_url.map(str::to_string),
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_user(&User::new("u1", "anna", 0)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn seventh_badge_is_rejected() {
        let store = seeded().await;
        for index in 0..6 {
            create(&store, "u1", input(&format!("badge {}", index), None), 0).await.unwrap();
        }

        let result = create(&store, "u1", input("one too many", None), 0).await;
        assert!(matches!(result, Err(AppError::ResourceExhausted(_))));
        assert_eq!(list(&store, "u1").await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn validates_name_and_description() {
        let store = seeded().await;
        assert!(matches!(create(&store, "u1", input("   ", None), 0).await, Err(AppError::InvalidArgument(_))));
        assert!(matches!(
            create(&store, "u1", input(&"x".repeat(31), None), 0).await,
            Err(AppError::InvalidArgument(_))
        ));

        let mut long = input("ok", None);
        long.description = "d".repeat(121);
        assert!(matches!(create(&store, "u1", long, 0).await, Err(AppError::InvalidArgument(_))));
        assert!(list(&store, "u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_patches_given_fields() {
        let store = seeded().await;
        let badge = create(&store, "u1", input("vecchio", None), 0).await.unwrap();

        let mut media = MockMediaStorage::new();
        media.expect_remove().times(0);

        let patch = CustomBadgeUpdate { name: Some("nuovo".into()), ..Default::default() };
        let updated = update(&store, &media, "u1", &badge.uuid, patch).await.unwrap();
        assert_eq!(updated.name, "nuovo");
        assert_eq!(updated.description, "fatto a mano");

        let missing = update(&store, &media, "u1", "nope", CustomBadgeUpdate::default()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn replacing_the_image_removes_the_old_one() {
        let store = seeded().await;
        let badge = create(&store, "u1", input("mio", Some("badges/u1/old.png")), 0).await.unwrap();

        let mut media = MockMediaStorage::new();
        media
            .expect_remove()
            .withf(|image_url| image_url.ends_with("u1/old.png"))
            .times(1)
            .returning(|_| Ok(()));

        let patch = CustomBadgeUpdate { image_url: Some("badges/u1/new.png".into()), ..Default::default() };
        let updated = update(&store, &media, "u1", &badge.uuid, patch).await.unwrap();
        assert_eq!(updated.image_url.as_deref(), Some("badges/u1/new.png"));

        let same = CustomBadgeUpdate { image_url: Some("badges/u1/new.png".into()), ..Default::default() };
        let mut idle = MockMediaStorage::new();
        idle.expect_remove().times(0);
        update(&store, &idle, "u1", &badge.uuid, same).await.unwrap();
    }

    #[tokio::test]
    async fn image_must_live_under_the_owner() {
        let store = seeded().await;
        for foreign in ["badges/u2/mine.png", "badges/u1/../u2/mine.png", "badges/u1/", "avatars/u1/a.png"] {
            assert!(matches!(
                create(&store, "u1", input("mio", Some(foreign)), 0).await,
                Err(AppError::InvalidArgument(_))
            ));
        }

        let badge = create(&store, "u1", input("mio", Some("/badges/u1/a.png")), 0).await.unwrap();
        assert_eq!(badge.image_url.as_deref(), Some("badges/u1/a.png"));

        let media = MockMediaStorage::new();
        let patch = CustomBadgeUpdate { image_url: Some("badges/u2/mine.png".into()), ..Default::default() };
        assert!(matches!(
            update(&store, &media, "u1", &badge.uuid, patch).await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn delete_never_touches_another_users_upload() {
        let root = std::env::temp_dir().join(format!("segreto-badges-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(root.join("badges/u2")).await.unwrap();
        tokio::fs::write(root.join("badges/u2/mine.png"), b"png").await.unwrap();
        let media = crate::builtins::media::LocalMediaStorage::new(root.clone());

        let store = seeded().await;
        let stale = CustomBadge {
            uuid: "b1".into(),
            owner_id: "u1".into(),
            name: "vecchio".into(),
            description: String::new(),
            image_url: Some("badges/u2/mine.png".into()),
            created_at: 0,
        };
        store.insert_custom_badge(&stale, MAX_CUSTOM_BADGES).await.unwrap();

        delete(&store, &media, "u1", "b1").await.unwrap();
        assert!(root.join("badges/u2/mine.png").exists());
        tokio::fs::remove_dir_all(root).await.unwrap();
    }

    #[tokio::test]
    async fn delete_clears_primary_and_survives_image_failure() {
        let store = seeded().await;
        let badge = create(&store, "u1", input("mio", Some("badges/u1/mio.png")), 0).await.unwrap();
        set_primary(&store, "u1", Some(PrimaryBadge::Custom(badge.uuid.clone()))).await.unwrap();

        let mut media = MockMediaStorage::new();
        media
            .expect_remove()
            .withf(|image_url| image_url.ends_with("u1/mio.png"))
            .times(1)
            .returning(|_| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")));

        delete(&store, &media, "u1", &badge.uuid).await.unwrap();

        assert!(list(&store, "u1").await.unwrap().is_empty());
        assert_eq!(store.find_user("u1").await.unwrap().unwrap().primary_badge, None);
    }

    #[tokio::test]
    async fn delete_keeps_unrelated_primary() {
        let store = seeded().await;
        store.add_badge("u1", BadgeKind::Pioneer).await.unwrap();
        set_primary(&store, "u1", Some(PrimaryBadge::Official(BadgeKind::Pioneer))).await.unwrap();
        let badge = create(&store, "u1", input("mio", None), 0).await.unwrap();

        let mut media = MockMediaStorage::new();
        media.expect_remove().times(0);
        delete(&store, &media, "u1", &badge.uuid).await.unwrap();

        assert_eq!(
            store.find_user("u1").await.unwrap().unwrap().primary_badge,
            Some(PrimaryBadge::Official(BadgeKind::Pioneer))
        );
        assert!(matches!(delete(&store, &media, "u1", &badge.uuid).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn primary_requires_ownership() {
        let store = seeded().await;
        assert!(matches!(
            set_primary(&store, "u1", Some(PrimaryBadge::Official(BadgeKind::King))).await,
            Err(AppError::FailedPrecondition(_))
        ));
        assert!(matches!(
            set_primary(&store, "u1", Some(PrimaryBadge::Custom("nope".into()))).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(set_primary(&store, "u1", None).await.unwrap(), None);
    }
}
