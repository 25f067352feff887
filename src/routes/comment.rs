use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/comment")
        //Create
        .route(
          "",
          web::post().to(Handler::Comment::Create::task)
        )
    );
}
