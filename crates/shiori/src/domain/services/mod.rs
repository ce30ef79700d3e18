pub mod library;
pub mod reconcile;
