use serde_json::json;
use actix_web::{web, Error, HttpResponse};
use crate::AppState;
use crate::service::badge;
use crate::Middleware::Auth::RequireAccess;

pub async fn task(
    access: RequireAccess,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    log::info!("Badge sweep requested by {}", access.user_id);
    let summary = badge::reconcile_all_users(state.store.as_ref()).await?;

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "status": "success",
            "message": format!("Controllati {} utenti.", summary.users_examined),
            "usersExamined": summary.users_examined,
            "badgesGranted": summary.badges_granted,
        }))
    )
}
