use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notification")
        //List
        .route(
          "",
          web::get().to(Handler::Notification::List::task)
        )
        //Mark all as read
        .route(
          "/read",
          web::post().to(Handler::Notification::Read::task)
        )
    );
}
