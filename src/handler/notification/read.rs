use serde_json::json;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::notification;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let updated = notification::mark_all_read(state.store.as_ref(), &access.user_id).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({ "updated": updated }))
    )
}
