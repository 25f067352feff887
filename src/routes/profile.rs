use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/profile")
        //Create
        .route(
          "",
          web::post().to(Handler::Profile::Create::task)
        )
        //Primary badge
        .route(
          "/primary-badge",
          web::put().to(Handler::Profile::PrimaryBadge::task)
        )
        //Get
        .route(
          "/{uuid}",
          web::get().to(Handler::Profile::Get::task)
        )
        //Follow / unfollow
        .route(
          "/{uuid}/follow",
          web::post().to(Handler::Profile::Follow::task)
        )
    );
}
