use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::custom_badge::{self, NewCustomBadge};
use crate::utils::time::now_millis;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    form_data: web::Json<NewCustomBadge>,
) -> Result<HttpResponse, Error> {
    let badge = custom_badge::create(
        state.store.as_ref(),
        &access.user_id,
        form_data.into_inner(),
        now_millis(),
    ).await?;

    Ok(
        HttpResponse::Created()
        .content_type("application/json")
        .json(badge)
    )
}
