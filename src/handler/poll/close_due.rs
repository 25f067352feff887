use serde_json::json;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::poll;
use crate::utils::time::now_millis;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    log::info!("Poll closer run requested by {}", access.user_id);
    let closed = poll::close_due_polls(state.store.as_ref(), now_millis()).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({ "closed": closed }))
    )
}
