pub mod render;
pub use render as Render;
