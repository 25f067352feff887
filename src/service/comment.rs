use serde::Deserialize;
use crate::error::{AppError, AppResult};
use crate::model::{
    comment::Comment,
    notification::{Notification, NotificationType},
};
use crate::store::Store;
use crate::utils::string::ellipsize;
use super::{badge::{self, Trigger}, notification};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub post_id: String,
    pub text: String,
    pub parent_id: Option<String>,
}

/// Adds a comment, or a reply when `parent_id` is set, and notifies the post
/// author and the parent's author. Nobody is notified about their own
/// activity, and a reply to the post author's own comment notifies them once.
pub async fn create_comment(
    store: &dyn Store,
    author_id: &str,
    input: NewComment,
    now: i64,
) -> AppResult<Comment> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(AppError::InvalidArgument("text is required".to_string()));
    }

    let author = store.find_user(author_id).await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    let post = store.find_post(&input.post_id).await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    let parent = match &input.parent_id {
        Some(parent_id) => {
            let parent = store.find_comment(parent_id).await?
                .ok_or_else(|| AppError::NotFound("parent comment not found".to_string()))?;
            if parent.post_id != post.uuid {
                return Err(AppError::InvalidArgument("parent comment belongs to another post".to_string()));
            }
            Some(parent)
        },
        None => None,
    };

    let comment = Comment {
        uuid: uuid::Uuid::new_v4().to_string(),
        post_id: post.uuid.clone(),
        author_id: author_id.to_string(),
        author: author.username.clone(),
        text: text.to_string(),
        score: 0,
        parent_id: parent.as_ref().map(|parent| parent.uuid.clone()),
        created_at: now,
    };

    if !store.insert_comment(&comment).await? {
        return Err(AppError::NotFound("post not found".to_string()));
    }

    let excerpt = ellipsize(&comment.text, 50);
    let mut notified = vec![author_id.to_string()];

    if let Some(parent) = &parent {
        if !notified.contains(&parent.author_id) {
            let reply = Notification::new(
                &parent.author_id,
                NotificationType::Reply,
                Some(post.uuid.as_str()),
                format!("{} ha risposto al tuo commento: \"{}\"", author.username, excerpt),
                now,
            )
            .with_comment(&comment.uuid);
            notification::notify(store, &reply).await;
            notified.push(parent.author_id.clone());
        }
    }

    if !notified.contains(&post.author_id) {
        let on_post = Notification::new(
            &post.author_id,
            NotificationType::Comment,
            Some(post.uuid.as_str()),
            format!("{} ha commentato il tuo post: \"{}\"", author.username, excerpt),
            now,
        )
        .with_comment(&comment.uuid);
        notification::notify(store, &on_post).await;
    }

    badge::evaluate_and_grant(store, author_id, Trigger::CommentCreated).await;

    Ok(comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{account::User, post::Post};
    use crate::store::MemoryStore;

    fn input(post_id: &str, parent_id: Option<&str>) -> NewComment {
        NewComment {
            post_id: post_id.to_string(),
            text: "bella domanda".to_string(),
            parent_id: parent_id.map(str::to_string),
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (uuid, username) in [("u1", "anna"), ("u2", "bruno"), ("u3", "carla")] {
            store.insert_user(&User::new(uuid, username, 0)).await.unwrap();
        }
        store.insert_post(&Post::new("p1", "u1", "anna", "ciao", 0)).await.unwrap();
        store.insert_post(&Post::new("p2", "u1", "anna", "altro", 0)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn comment_notifies_post_author_and_bumps_count() {
        let store = seeded().await;
        let comment = create_comment(&store, "u2", input("p1", None), 10).await.unwrap();

        assert_eq!(store.find_post("p1").await.unwrap().unwrap().comments_count, 1);
        let notifications = store.notifications_for("u1", None, None).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].n_type, NotificationType::Comment);
        assert_eq!(notifications[0].comment_id.as_deref(), Some(comment.uuid.as_str()));
    }

    #[tokio::test]
    async fn reply_notifies_parent_author_once() {
        let store = seeded().await;
        let parent = create_comment(&store, "u2", input("p1", None), 10).await.unwrap();
        create_comment(&store, "u3", input("p1", Some(&parent.uuid)), 20).await.unwrap();

        let to_parent = store.notifications_for("u2", None, None).await.unwrap();
        assert_eq!(to_parent.len(), 1);
        assert_eq!(to_parent[0].n_type, NotificationType::Reply);
        assert_eq!(store.notifications_for("u1", None, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn own_activity_is_not_notified() {
        let store = seeded().await;
        let parent = create_comment(&store, "u1", input("p1", None), 10).await.unwrap();
        create_comment(&store, "u1", input("p1", Some(&parent.uuid)), 20).await.unwrap();
        assert!(store.notifications_for("u1", None, None).await.unwrap().is_empty());

        create_comment(&store, "u2", input("p1", Some(&parent.uuid)), 30).await.unwrap();
        let notifications = store.notifications_for("u1", None, None).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].n_type, NotificationType::Reply);
    }

    #[tokio::test]
    async fn parent_must_belong_to_the_post() {
        let store = seeded().await;
        let parent = create_comment(&store, "u2", input("p1", None), 10).await.unwrap();

        let result = create_comment(&store, "u3", input("p2", Some(&parent.uuid)), 20).await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
        assert!(matches!(
            create_comment(&store, "u3", input("missing", None), 20).await,
            Err(AppError::NotFound(_))
        ));
    }
}
