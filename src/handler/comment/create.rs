use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::comment::{self, NewComment};
use crate::utils::time::now_millis;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
    form_data: web::Json<NewComment>,
) -> Result<HttpResponse, Error> {
    let comment = comment::create_comment(
        state.store.as_ref(),
        &access.user_id,
        form_data.into_inner(),
        now_millis(),
    ).await?;

    Ok(
        HttpResponse::Created()
        .content_type("application/json")
        .json(comment)
    )
}
