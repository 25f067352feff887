use actix_web::web;
use crate::Handler;
use crate::middleware::auth::AccessRequirement;
use crate::model::account::AccountRole;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/poll")
        .service(
            web::resource("/close-due")
                .app_data(web::Data::new(AccessRequirement::Role(AccountRole::Administrator)))
                .route(web::post().to(Handler::Poll::CloseDue::task))
        )
    );
}
