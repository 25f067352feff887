//! MongoDB-backed [`Store`].
//!
//! Multi-document operations run inside a client-session transaction opened
//! with [`MongoDB::connect_acid`]; a failure anywhere aborts the whole unit.

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use serde::Deserialize;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    ClientSession,
    Database,
    IndexModel,
};
use crate::builtins::mongo::MongoDB;
use crate::error::StoreResult;
use crate::utils::mongo::find_with_pagination;
use crate::model::{
    account::{PrimaryBadge, User},
    badge::{BadgeKind, CustomBadge, CustomBadgeUpdate},
    comment::Comment,
    notification::Notification,
    post::{self, Post, VoteDirection, VoteOutcome},
};
use super::{Store, COMMENTS, CUSTOM_BADGES, NOTIFICATIONS, POSTS, USERS};

#[derive(Clone)]
pub struct MongoStore {
    mongo: MongoDB,
}

#[derive(Debug, Deserialize)]
struct UuidRead {
    uuid: String,
}

#[derive(Debug, Deserialize)]
struct ScoreRead {
    #[serde(default)]
    score: i64,
}

impl MongoStore {
    pub async fn new(mongo: MongoDB) -> StoreResult<Self> {
        let store = Self { mongo };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> StoreResult<()> {
        let db = self.mongo.connect();
        let unique = || IndexOptions::builder().unique(true).build();

        db.collection::<Document>(USERS)
            .create_index(IndexModel::builder().keys(doc! { "uuid": 1 }).options(unique()).build())
            .await?;
        db.collection::<Document>(USERS)
            .create_index(IndexModel::builder().keys(doc! { "username": 1 }).options(unique()).build())
            .await?;
        db.collection::<Document>(POSTS)
            .create_index(IndexModel::builder().keys(doc! { "uuid": 1 }).options(unique()).build())
            .await?;
        db.collection::<Document>(POSTS)
            .create_index(IndexModel::builder().keys(doc! { "authorId": 1 }).build())
            .await?;
        db.collection::<Document>(POSTS)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "isPoll": 1, "pollNotified": 1, "pollEndDate": 1 })
                    .build(),
            )
            .await?;
        db.collection::<Document>(COMMENTS)
            .create_index(IndexModel::builder().keys(doc! { "authorId": 1 }).build())
            .await?;
        db.collection::<Document>(NOTIFICATIONS)
            .create_index(IndexModel::builder().keys(doc! { "recipientId": 1, "timestamp": -1 }).build())
            .await?;
        db.collection::<Document>(CUSTOM_BADGES)
            .create_index(IndexModel::builder().keys(doc! { "ownerId": 1 }).build())
            .await?;

        Ok(())
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

/// Commits on success, aborts on failure. The original error wins over an
/// abort failure.
async fn finish<T>(mut session: ClientSession, result: StoreResult<T>) -> StoreResult<T> {
    match result {
        Ok(value) => {
            session.commit_transaction().await?;
            Ok(value)
        },
        Err(error) => {
            if let Err(abort_error) = session.abort_transaction().await {
                log::error!("{:?}", abort_error);
            }
            Err(error)
        },
    }
}

async fn count_capped(
    db: &Database,
    collection: &str,
    filter: Document,
    cap: Option<u64>,
) -> StoreResult<u64> {
    let collection = db.collection::<Document>(collection);
    let mut action = collection.count_documents(filter);
    if let Some(cap) = cap {
        action = action.limit(cap);
    }
    Ok(action.await?)
}

async fn follow_in(
    db: &Database,
    session: &mut ClientSession,
    follower_id: &str,
    target_id: &str,
    follow: bool,
    notification: Option<Notification>,
) -> StoreResult<bool> {
    let users = db.collection::<User>(USERS);
    let (follower_filter, follower_update, target_update) = if follow {
        (
            doc! { "uuid": follower_id, "following": { "$ne": target_id } },
            doc! { "$addToSet": { "following": target_id } },
            doc! { "$addToSet": { "followers": follower_id } },
        )
    }
    else {
        (
            doc! { "uuid": follower_id, "following": target_id },
            doc! { "$pull": { "following": target_id } },
            doc! { "$pull": { "followers": follower_id } },
        )
    };

    let result = users
        .update_one(follower_filter, follower_update)
        .session(&mut *session)
        .await?;
    if result.matched_count == 0 {
        return Ok(false);
    }
    users
        .update_one(doc! { "uuid": target_id }, target_update)
        .session(&mut *session)
        .await?;

    if let Some(notification) = notification {
        db.collection::<Notification>(NOTIFICATIONS)
            .insert_one(&notification)
            .session(&mut *session)
            .await?;
    }

    Ok(true)
}

async fn vote_in(
    db: &Database,
    session: &mut ClientSession,
    post_id: &str,
    user_id: &str,
    direction: VoteDirection,
) -> StoreResult<Option<VoteOutcome>> {
    let posts = db.collection::<Post>(POSTS);
    let mut post = match posts.find_one(doc! { "uuid": post_id }).session(&mut *session).await? {
        Some(post) => post,
        None => return Ok(None),
    };

    let outcome = post::apply_vote(&mut post, user_id, direction);
    posts
        .update_one(
            doc! { "uuid": post_id },
            doc! { "$set": {
                "score": post.score,
                "upvotedBy": post.upvoted_by.clone(),
                "downvotedBy": post.downvoted_by.clone(),
            }},
        )
        .session(&mut *session)
        .await?;

    Ok(Some(outcome))
}

async fn poll_vote_in(
    db: &Database,
    session: &mut ClientSession,
    post_id: &str,
    user_id: &str,
    option_index: usize,
) -> StoreResult<Option<bool>> {
    let posts = db.collection::<Post>(POSTS);
    let mut post = match posts.find_one(doc! { "uuid": post_id }).session(&mut *session).await? {
        Some(post) => post,
        None => return Ok(None),
    };

    let voted = match post::toggle_poll_vote(&mut post, user_id, option_index) {
        Some(voted) => voted,
        None => return Ok(None),
    };

    posts
        .update_one(
            doc! { "uuid": post_id },
            doc! { "$set": { "pollOptions": to_bson(&post.poll_options)? } },
        )
        .session(&mut *session)
        .await?;

    Ok(Some(voted))
}

async fn repost_in(
    db: &Database,
    session: &mut ClientSession,
    repost: &Post,
    original_id: &str,
) -> StoreResult<bool> {
    let result = db.collection::<Post>(POSTS)
        .update_one(
            doc! { "uuid": original_id, "repostedBy": { "$ne": repost.author_id.as_str() } },
            doc! {
                "$addToSet": { "repostedBy": repost.author_id.as_str() },
                "$inc": { "repostsCount": 1_i64 },
            },
        )
        .session(&mut *session)
        .await?;

    if result.matched_count == 0 {
        return Ok(false);
    }

    db.collection::<Post>(POSTS).insert_one(repost).session(&mut *session).await?;
    Ok(true)
}

async fn close_poll_in(
    db: &Database,
    session: &mut ClientSession,
    poll_id: &str,
    notifications: Vec<Notification>,
) -> StoreResult<bool> {
    let result = db.collection::<Post>(POSTS)
        .update_one(
            doc! { "uuid": poll_id, "pollNotified": false },
            doc! { "$set": { "pollNotified": true } },
        )
        .session(&mut *session)
        .await?;

    if result.matched_count == 0 {
        return Ok(false);
    }

    if !notifications.is_empty() {
        db.collection::<Notification>(NOTIFICATIONS)
            .insert_many(&notifications)
            .session(&mut *session)
            .await?;
    }

    Ok(true)
}

async fn comment_in(
    db: &Database,
    session: &mut ClientSession,
    comment: &Comment,
) -> StoreResult<bool> {
    let result = db.collection::<Post>(POSTS)
        .update_one(
            doc! { "uuid": comment.post_id.as_str() },
            doc! { "$inc": { "commentsCount": 1_i64 } },
        )
        .session(&mut *session)
        .await?;

    if result.matched_count == 0 {
        return Ok(false);
    }

    db.collection::<Comment>(COMMENTS).insert_one(comment).session(&mut *session).await?;
    Ok(true)
}

async fn custom_badge_in(
    db: &Database,
    session: &mut ClientSession,
    badge: &CustomBadge,
    limit: u64,
) -> StoreResult<bool> {
    // Touching the owner document makes concurrent creations for the same
    // owner conflict, so the count below cannot be raced past the limit.
    db.collection::<Document>(USERS)
        .update_one(
            doc! { "uuid": badge.owner_id.as_str() },
            doc! { "$set": { "customBadgesModifiedAt": Utc::now().timestamp_millis() } },
        )
        .session(&mut *session)
        .await?;

    let held = db.collection::<CustomBadge>(CUSTOM_BADGES)
        .count_documents(doc! { "ownerId": badge.owner_id.as_str() })
        .session(&mut *session)
        .await?;

    if held >= limit {
        return Ok(false);
    }

    db.collection::<CustomBadge>(CUSTOM_BADGES).insert_one(badge).session(&mut *session).await?;
    Ok(true)
}

#[async_trait]
impl Store for MongoStore {
    async fn insert_user(&self, user: &User) -> StoreResult<bool> {
        let result = self.mongo.connect().collection::<User>(USERS).insert_one(user).await;
        match result {
            Ok(_) => Ok(true),
            Err(error) if is_duplicate_key(&error) => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let collection = self.mongo.connect().collection::<User>(USERS);
        Ok(collection.find_one(doc! { "uuid": user_id }).await?)
    }

    async fn find_user_id_by_username(&self, username: &str) -> StoreResult<Option<String>> {
        let collection = self.mongo.connect().collection::<UuidRead>(USERS);
        let result = collection
            .find_one(doc! { "username": username })
            .projection(doc! { "uuid": 1, "_id": 0 })
            .await?;
        Ok(result.map(|read| read.uuid))
    }

    async fn list_user_ids(&self) -> StoreResult<Vec<String>> {
        let collection = self.mongo.connect().collection::<UuidRead>(USERS);
        let cursor = collection
            .find(doc! {})
            .projection(doc! { "uuid": 1, "_id": 0 })
            .await?;
        let reads: Vec<UuidRead> = cursor.try_collect().await?;
        Ok(reads.into_iter().map(|read| read.uuid).collect())
    }

    async fn add_badge(&self, user_id: &str, badge: BadgeKind) -> StoreResult<()> {
        let collection = self.mongo.connect().collection::<User>(USERS);
        collection
            .update_one(
                doc! { "uuid": user_id },
                doc! { "$addToSet": { "badges": badge.as_str() } },
            )
            .await?;
        Ok(())
    }

    async fn set_primary_badge(&self, user_id: &str, badge: Option<PrimaryBadge>) -> StoreResult<()> {
        let value = match badge {
            Some(badge) => to_bson(&badge)?,
            None => Bson::Null,
        };
        let collection = self.mongo.connect().collection::<User>(USERS);
        collection
            .update_one(doc! { "uuid": user_id }, doc! { "$set": { "primaryBadge": value } })
            .await?;
        Ok(())
    }

    async fn clear_primary_badge_if(&self, user_id: &str, badge: &PrimaryBadge) -> StoreResult<bool> {
        let collection = self.mongo.connect().collection::<User>(USERS);
        let result = collection
            .update_one(
                doc! { "uuid": user_id, "primaryBadge": to_bson(badge)? },
                doc! { "$set": { "primaryBadge": Bson::Null } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn apply_follow(
        &self,
        follower_id: &str,
        target_id: &str,
        follow: bool,
        notification: Option<Notification>,
    ) -> StoreResult<bool> {
        let (db, mut session) = self.mongo.connect_acid().await?;
        let result = follow_in(&db, &mut session, follower_id, target_id, follow, notification).await;
        finish(session, result).await
    }

    async fn insert_post(&self, post: &Post) -> StoreResult<()> {
        self.mongo.connect().collection::<Post>(POSTS).insert_one(post).await?;
        Ok(())
    }

    async fn find_post(&self, post_id: &str) -> StoreResult<Option<Post>> {
        let collection = self.mongo.connect().collection::<Post>(POSTS);
        Ok(collection.find_one(doc! { "uuid": post_id }).await?)
    }

    async fn count_posts_by_author(&self, author_id: &str, cap: Option<u64>) -> StoreResult<u64> {
        count_capped(&self.mongo.connect(), POSTS, doc! { "authorId": author_id }, cap).await
    }

    async fn post_scores_by_author(&self, author_id: &str) -> StoreResult<Vec<i64>> {
        let collection = self.mongo.connect().collection::<ScoreRead>(POSTS);
        let cursor = collection
            .find(doc! { "authorId": author_id })
            .projection(doc! { "score": 1, "_id": 0 })
            .await?;
        let reads: Vec<ScoreRead> = cursor.try_collect().await?;
        Ok(reads.into_iter().map(|read| read.score).collect())
    }

    async fn apply_post_vote(
        &self,
        post_id: &str,
        user_id: &str,
        direction: VoteDirection,
    ) -> StoreResult<Option<VoteOutcome>> {
        let (db, mut session) = self.mongo.connect_acid().await?;
        let result = vote_in(&db, &mut session, post_id, user_id, direction).await;
        finish(session, result).await
    }

    async fn toggle_poll_vote(
        &self,
        post_id: &str,
        user_id: &str,
        option_index: usize,
    ) -> StoreResult<Option<bool>> {
        let (db, mut session) = self.mongo.connect_acid().await?;
        let result = poll_vote_in(&db, &mut session, post_id, user_id, option_index).await;
        finish(session, result).await
    }

    async fn insert_repost(&self, repost: &Post, original_id: &str) -> StoreResult<bool> {
        let (db, mut session) = self.mongo.connect_acid().await?;
        let result = repost_in(&db, &mut session, repost, original_id).await;
        finish(session, result).await
    }

    async fn find_due_polls(&self, now: i64) -> StoreResult<Vec<Post>> {
        let collection = self.mongo.connect().collection::<Post>(POSTS);
        let cursor = collection
            .find(doc! {
                "isPoll": true,
                "pollNotified": false,
                "pollEndDate": { "$lte": now },
            })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn close_poll(&self, poll_id: &str, notifications: Vec<Notification>) -> StoreResult<bool> {
        let (db, mut session) = self.mongo.connect_acid().await?;
        let result = close_poll_in(&db, &mut session, poll_id, notifications).await;
        finish(session, result).await
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<bool> {
        let (db, mut session) = self.mongo.connect_acid().await?;
        let result = comment_in(&db, &mut session, comment).await;
        finish(session, result).await
    }

    async fn find_comment(&self, comment_id: &str) -> StoreResult<Option<Comment>> {
        let collection = self.mongo.connect().collection::<Comment>(COMMENTS);
        Ok(collection.find_one(doc! { "uuid": comment_id }).await?)
    }

    async fn count_comments_by_author(&self, author_id: &str, cap: Option<u64>) -> StoreResult<u64> {
        count_capped(&self.mongo.connect(), COMMENTS, doc! { "authorId": author_id }, cap).await
    }

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        let collection = self.mongo.connect().collection::<Notification>(NOTIFICATIONS);
        collection.insert_one(notification).await?;
        Ok(())
    }

    async fn notifications_for(
        &self,
        recipient_id: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> StoreResult<Vec<Notification>> {
        let collection = self.mongo.connect().collection::<Notification>(NOTIFICATIONS);
        let cursor = find_with_pagination(
            &collection,
            doc! { "recipientId": recipient_id },
            "timestamp",
            limit,
            page,
        ).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn mark_all_read(&self, recipient_id: &str) -> StoreResult<u64> {
        let collection = self.mongo.connect().collection::<Notification>(NOTIFICATIONS);
        let result = collection
            .update_many(
                doc! { "recipientId": recipient_id, "isRead": false },
                doc! { "$set": { "isRead": true } },
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn insert_custom_badge(&self, badge: &CustomBadge, limit: u64) -> StoreResult<bool> {
        let (db, mut session) = self.mongo.connect_acid().await?;
        let result = custom_badge_in(&db, &mut session, badge, limit).await;
        finish(session, result).await
    }

    async fn find_custom_badge(&self, owner_id: &str, badge_id: &str) -> StoreResult<Option<CustomBadge>> {
        let collection = self.mongo.connect().collection::<CustomBadge>(CUSTOM_BADGES);
        Ok(collection.find_one(doc! { "uuid": badge_id, "ownerId": owner_id }).await?)
    }

    async fn list_custom_badges(&self, owner_id: &str) -> StoreResult<Vec<CustomBadge>> {
        let collection = self.mongo.connect().collection::<CustomBadge>(CUSTOM_BADGES);
        let cursor = collection
            .find(doc! { "ownerId": owner_id })
            .sort(doc! { "createdAt": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_custom_badge(
        &self,
        owner_id: &str,
        badge_id: &str,
        update: &CustomBadgeUpdate,
    ) -> StoreResult<Option<CustomBadge>> {
        let mut set = Document::new();
        if let Some(name) = &update.name {
            set.insert("name", name.clone());
        }
        if let Some(description) = &update.description {
            set.insert("description", description.clone());
        }
        if let Some(image_url) = &update.image_url {
            set.insert("imageUrl", image_url.clone());
        }

        let collection = self.mongo.connect().collection::<CustomBadge>(CUSTOM_BADGES);
        let filter = doc! { "uuid": badge_id, "ownerId": owner_id };
        if set.is_empty() {
            return Ok(collection.find_one(filter).await?);
        }

        Ok(collection
            .find_one_and_update(filter, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_custom_badge(&self, owner_id: &str, badge_id: &str) -> StoreResult<bool> {
        let collection = self.mongo.connect().collection::<CustomBadge>(CUSTOM_BADGES);
        let result = collection.delete_one(doc! { "uuid": badge_id, "ownerId": owner_id }).await?;
        Ok(result.deleted_count > 0)
    }
}
