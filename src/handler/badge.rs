pub mod list_custom;
pub use list_custom as ListCustom;

pub mod create_custom;
pub use create_custom as CreateCustom;

pub mod update_custom;
pub use update_custom as UpdateCustom;

pub mod delete_custom;
pub use delete_custom as DeleteCustom;

pub mod reconcile;
pub use reconcile as Reconcile;
