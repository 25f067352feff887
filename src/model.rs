pub mod account;
pub use account as Account;

pub mod badge;
pub use badge as Badge;

pub mod post;
pub use post as Post;

pub mod comment;
pub use comment as Comment;

pub mod notification;
pub use notification as Notification;
