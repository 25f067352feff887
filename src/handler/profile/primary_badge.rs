use serde::Deserialize;
use serde_json::json;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::model::account::PrimaryBadge;
use crate::service::custom_badge;
use crate::Middleware::Auth::RequireAccess;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReqBody {
    primary_badge: Option<PrimaryBadge>,
}

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    form_data: web::Json<ReqBody>,
) -> Result<HttpResponse, Error> {
    let selection = custom_badge::set_primary(
        state.store.as_ref(),
        &access.user_id,
        form_data.into_inner().primary_badge,
    ).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({ "primaryBadge": selection }))
    )
}
