use serde::Serialize;
use crate::error::AppResult;
use crate::model::notification::Notification;
use crate::store::Store;
use crate::utils::time::format_time_ago;

/// Best-effort insert. Failures are logged and never reach the caller.
pub async fn notify(store: &dyn Store, notification: &Notification) {
    if let Err(error) = store.insert_notification(notification).await {
        log::error!("{:?}", error);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    pub time_ago: String,
}

pub async fn list(
    store: &dyn Store,
    recipient_id: &str,
    limit: Option<u32>,
    page: Option<u32>,
    now: i64,
) -> AppResult<Vec<NotificationView>> {
    let notifications = store.notifications_for(recipient_id, limit, page).await?;
    Ok(notifications
        .into_iter()
        .map(|notification| {
            let time_ago = format_time_ago(Some(notification.timestamp), now);
            NotificationView { notification, time_ago }
        })
        .collect())
}

pub async fn mark_all_read(store: &dyn Store, recipient_id: &str) -> AppResult<u64> {
    Ok(store.mark_all_read(recipient_id).await?)
}
