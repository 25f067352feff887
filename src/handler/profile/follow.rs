use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::follow;
use crate::utils::time::now_millis;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let target_id = path.into_inner();
    let outcome = follow::toggle(
        state.store.as_ref(),
        &access.user_id,
        Some(target_id.as_str()),
        now_millis(),
    ).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(outcome)
    )
}
