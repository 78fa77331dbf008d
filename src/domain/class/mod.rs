//! Class aggregate

pub mod model;
pub mod repository;

pub use model::{Class, ClassInput};
pub use repository::ClassRepositoryInterface;
