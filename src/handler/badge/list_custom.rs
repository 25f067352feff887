use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::custom_badge;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let badges = custom_badge::list(state.store.as_ref(), &access.user_id).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(badges)
    )
}
