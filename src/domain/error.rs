use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}
