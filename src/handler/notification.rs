pub mod list;
pub use list as List;

pub mod read;
pub use read as Read;
