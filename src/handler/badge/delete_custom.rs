use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::custom_badge;
use crate::utils::response::Response;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let badge_id = path.into_inner();
    custom_badge::delete(
        state.store.as_ref(),
        state.media.as_ref(),
        &access.user_id,
        &badge_id,
    ).await?;

    Ok(Response::ok("badge deleted"))
}
