//! News aggregate

pub mod model;
pub mod repository;

pub use model::{CreateNewsDto, News, NewsStatus};
pub use repository::NewsRepositoryInterface;
