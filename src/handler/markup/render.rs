use serde::Deserialize;
use serde_json::json;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::utils::markup;
use crate::Middleware::Auth::RequireAccess;

#[derive(Debug, Deserialize)]
pub struct ReqBody {
    #[serde(default)]
    text: String,
}

pub async fn task(
    _access: RequireAccess,
    state: web::Data<AppState>,
    form_data: web::Json<ReqBody>,
) -> Result<HttpResponse, Error> {
    let html = markup::render(state.store.as_ref(), &form_data.text).await;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({ "html": html }))
    )
}
