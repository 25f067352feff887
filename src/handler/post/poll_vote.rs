use serde::Deserialize;
use serde_json::json;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::poll;
use crate::utils::time::now_millis;
use crate::Middleware::Auth::RequireAccess;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReqBody {
    option_index: usize,
}

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form_data: web::Json<ReqBody>,
) -> Result<HttpResponse, Error> {
    let post_id = path.into_inner();
    let voted = poll::vote(
        state.store.as_ref(),
        &access.user_id,
        &post_id,
        form_data.option_index,
        now_millis(),
    ).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "uuid": post_id,
            "optionIndex": form_data.option_index,
            "voted": voted,
        }))
    )
}
