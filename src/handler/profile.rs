pub mod create;
pub use create as Create;

pub mod get;
pub use get as Get;

pub mod follow;
pub use follow as Follow;

pub mod primary_badge;
pub use primary_badge as PrimaryBadge;
