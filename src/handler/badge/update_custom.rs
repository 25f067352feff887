use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::model::badge::CustomBadgeUpdate;
use crate::service::custom_badge;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form_data: web::Json<CustomBadgeUpdate>,
) -> Result<HttpResponse, Error> {
    let badge_id = path.into_inner();
    let badge = custom_badge::update(
        state.store.as_ref(),
        state.media.as_ref(),
        &access.user_id,
        &badge_id,
        form_data.into_inner(),
    ).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(badge)
    )
}
