use serde::Deserialize;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::profile;
use crate::utils::time::now_millis;
use crate::Middleware::Auth::RequireAccess;

#[derive(Debug, Deserialize)]
pub struct ReqBody {
    username: String,
}

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    form_data: web::Json<ReqBody>,
) -> Result<HttpResponse, Error> {
    let user = profile::create(
        state.store.as_ref(),
        &access.user_id,
        &form_data.username,
        now_millis(),
    ).await?;

    Ok(
        HttpResponse::Created()
        .content_type("application/json")
        .json(user)
    )
}
