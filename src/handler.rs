pub mod profile;
pub use profile as Profile;

pub mod post;
pub use post as Post;

pub mod comment;
pub use comment as Comment;

pub mod notification;
pub use notification as Notification;

pub mod badge;
pub use badge as Badge;

pub mod poll;
pub use poll as Poll;

pub mod markup;
pub use markup as Markup;
