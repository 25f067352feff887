use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::profile;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    _access: RequireAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let target_id = path.into_inner();
    let view = profile::get(state.store.as_ref(), &target_id).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(view)
    )
}
