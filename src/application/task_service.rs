use async_trait::async_trait;
use chrono::Local;

use crate::domain::error::TaskError;
use crate::domain::repository::TaskRepository;
use crate::domain::task::{CreateTask, Task, TaskExport, TaskFilter, UpdateTask};

pub const EXPORT_FORMAT_VERSION: &str = "1.0";

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskError>;
    async fn get(&self, id: i64) -> Result<Task, TaskError>;
    async fn create(&self, input: CreateTask) -> Result<i64, TaskError>;
    async fn update(&self, id: i64, input: UpdateTask) -> Result<u64, TaskError>;
    async fn delete(&self, id: i64) -> Result<u64, TaskError>;
    async fn batch_delete(&self, ids: &[i64]) -> Result<u64, TaskError>;
    async fn batch_update_status(&self, ids: &[i64], is_completed: bool) -> Result<u64, TaskError>;
    async fn delete_completed(&self) -> Result<u64, TaskError>;
    async fn export_all(&self) -> Result<TaskExport, TaskError>;
}

#[derive(Clone)]
pub struct TaskServiceImpl<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskServiceImpl<R> {
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskError> {
        self.repo.list(filter).await
    }

    async fn get(&self, id: i64) -> Result<Task, TaskError> {
        self.repo.get(id).await?.ok_or(TaskError::NotFound)
    }

    async fn create(&self, input: CreateTask) -> Result<i64, TaskError> {
        self.repo.create(input).await
    }

    async fn update(&self, id: i64, input: UpdateTask) -> Result<u64, TaskError> {
        self.repo.update(id, input).await
    }

    async fn delete(&self, id: i64) -> Result<u64, TaskError> {
        self.repo.delete(id).await
    }

    async fn batch_delete(&self, ids: &[i64]) -> Result<u64, TaskError> {
        ensure_ids(ids)?;
        self.repo.batch_delete(ids).await
    }

    async fn batch_update_status(&self, ids: &[i64], is_completed: bool) -> Result<u64, TaskError> {
        ensure_ids(ids)?;
        self.repo.batch_update_status(ids, is_completed).await
    }

    async fn delete_completed(&self) -> Result<u64, TaskError> {
        self.repo.delete_completed().await
    }

    async fn export_all(&self) -> Result<TaskExport, TaskError> {
        let tasks = self.repo.list(TaskFilter::default()).await?;
        Ok(TaskExport {
            version: EXPORT_FORMAT_VERSION.to_string(),
            export_date: Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            tasks,
        })
    }
}

fn ensure_ids(ids: &[i64]) -> Result<(), TaskError> {
    if ids.is_empty() {
        return Err(TaskError::Validation("No task ids provided".into()));
    }
    Ok(())
}
