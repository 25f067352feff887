pub mod badge;
pub mod poll;
pub mod follow;
pub mod repost;
pub mod custom_badge;
pub mod post;
pub mod comment;
pub mod notification;
pub mod profile;
