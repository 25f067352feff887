use serde_json::json;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::repost;
use crate::utils::time::now_millis;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let original_id = path.into_inner();
    let new_post_id = repost::repost(
        state.store.as_ref(),
        &access.user_id,
        Some(original_id.as_str()),
        now_millis(),
    ).await?;

    Ok(
        HttpResponse::Created()
        .content_type("application/json")
        .json(json!({
            "success": true,
            "newPostId": new_post_id,
        }))
    )
}
