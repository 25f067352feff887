use actix_web::web;
use crate::Handler;
use crate::middleware::auth::AccessRequirement;
use crate::model::account::AccountRole;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/badge")
        //Custom badges
        .service(
            web::resource("/custom")
                .route(web::get().to(Handler::Badge::ListCustom::task))
                .route(web::post().to(Handler::Badge::CreateCustom::task))
        )
        .service(
            web::resource("/custom/{uuid}")
                .route(web::patch().to(Handler::Badge::UpdateCustom::task))
                .route(web::delete().to(Handler::Badge::DeleteCustom::task))
        )
        //Retroactive sweep
        .service(
            web::resource("/reconcile")
                .app_data(web::Data::new(AccessRequirement::Role(AccountRole::Administrator)))
                .route(web::post().to(Handler::Badge::Reconcile::task))
        )
    );
}
