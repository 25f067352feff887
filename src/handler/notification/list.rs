use serde::Deserialize;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::notification;
use crate::utils::time::now_millis;
use crate::Middleware::Auth::RequireAccess;

#[derive(Debug, Deserialize)]
pub struct Query {
    limit: Option<u32>,
    page: Option<u32>,
}

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    query: web::Query<Query>,
) -> Result<HttpResponse, Error> {
    let notifications = notification::list(
        state.store.as_ref(),
        &access.user_id,
        query.limit,
        query.page,
        now_millis(),
    ).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(notifications)
    )
}
