pub mod close_due;
pub use close_due as CloseDue;
