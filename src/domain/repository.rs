use async_trait::async_trait;

use super::error::TaskError;
use super::task::{CreateTask, Task, TaskFilter, UpdateTask};

/// Persistence operations for tasks. Every mutation is a single
/// auto-committed statement; batch operations affect all matching rows or
/// none. Implementations raise only `TaskError::Storage`.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn init(&self) -> Result<(), TaskError>;
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskError>;
    async fn get(&self, id: i64) -> Result<Option<Task>, TaskError>;
    /// Returns the assigned id.
    async fn create(&self, input: CreateTask) -> Result<i64, TaskError>;
    /// Returns the number of affected rows; zero is not an error.
    async fn update(&self, id: i64, input: UpdateTask) -> Result<u64, TaskError>;
    async fn delete(&self, id: i64) -> Result<u64, TaskError>;
    async fn batch_delete(&self, ids: &[i64]) -> Result<u64, TaskError>;
    async fn batch_update_status(&self, ids: &[i64], is_completed: bool) -> Result<u64, TaskError>;
    async fn delete_completed(&self) -> Result<u64, TaskError>;
}
