use async_trait::async_trait;

use super::{Class, ClassInput};
use crate::domain::DomainResult;

#[async_trait]
pub trait ClassRepositoryInterface: Send + Sync {
    async fn create_class(&self, input: ClassInput) -> DomainResult<Class>;
    async fn get_class(&self, id: &str) -> DomainResult<Option<Class>>;
    async fn list_classes(&self) -> DomainResult<Vec<Class>>;
    async fn update_class(&self, id: &str, input: ClassInput) -> DomainResult<Option<Class>>;
    async fn delete_class(&self, id: &str) -> DomainResult<bool>;
    async fn set_student_count(&self, id: &str, count: i32) -> DomainResult<()>;
    async fn count_classes(&self) -> DomainResult<u64>;
}
