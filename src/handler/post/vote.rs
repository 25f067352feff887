use serde::Deserialize;
use serde_json::json;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::model::post::VoteDirection;
use crate::service::post;
use crate::utils::time::now_millis;
use crate::Middleware::Auth::RequireAccess;

#[derive(Debug, Deserialize)]
pub struct ReqBody {
    direction: VoteDirection,
}

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form_data: web::Json<ReqBody>,
) -> Result<HttpResponse, Error> {
    let post_id = path.into_inner();
    let outcome = post::vote_post(
        state.store.as_ref(),
        &access.user_id,
        &post_id,
        form_data.direction,
        now_millis(),
    ).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "uuid": post_id,
            "score": outcome.change.after,
        }))
    )
}
