use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/post")
        //Create
        .route(
          "",
          web::post().to(Handler::Post::Create::task)
        )
        //Up/down vote
        .route(
          "/{uuid}/vote",
          web::post().to(Handler::Post::Vote::task)
        )
        //Poll vote
        .route(
          "/{uuid}/poll-vote",
          web::post().to(Handler::Post::PollVote::task)
        )
        //Repost
        .route(
          "/{uuid}/repost",
          web::post().to(Handler::Post::Repost::task)
        )
    );
}
