use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::domain::due_date::parse_due_date;
use crate::domain::error::TaskError;
use crate::domain::repository::TaskRepository;
use crate::domain::task::{CreateTask, Task, TaskFilter, UpdateTask};

const TASK_COLUMNS: &str =
    "id, title, description, is_completed, priority, category, due_date, created_at, updated_at, user_id";

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTaskRepository {
    pub async fn connect(database_url: &str) -> Result<Self, TaskError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn init(&self) -> Result<(), TaskError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                is_completed INTEGER NOT NULL DEFAULT 0,
                priority INTEGER NOT NULL DEFAULT 1,
                category INTEGER NOT NULL DEFAULT 4,
                due_date TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                user_id TEXT
            )",
        )
        .execute(&*self.pool)
        .await?;

        // list and export sort by updated_at; list filters on the other two.
        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks (is_completed)",
            "CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks (priority)",
            "CREATE INDEX IF NOT EXISTS idx_tasks_updated_at ON tasks (updated_at)",
        ] {
            sqlx::query(statement).execute(&*self.pool).await?;
        }
        Ok(())
    }

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskError> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks");
        let mut conditions: Vec<&str> = Vec::new();
        if filter.is_completed.is_some() {
            conditions.push("is_completed = ?");
        }
        if filter.priority.is_some() {
            conditions.push("priority = ?");
        }
        if filter.search.is_some() {
            conditions.push("(title LIKE ? OR description LIKE ?)");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY updated_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(completed) = filter.is_completed {
            query = query.bind(completed);
        }
        if let Some(priority) = filter.priority {
            query = query.bind(priority);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query = query.bind(pattern.clone()).bind(pattern);
        }

        let rows = query.fetch_all(&*self.pool).await?;
        let tasks = rows.iter().map(row_to_task).collect::<Result<_, _>>()?;
        Ok(tasks)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, TaskError> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_task).transpose()?)
    }

    async fn create(&self, input: CreateTask) -> Result<i64, TaskError> {
        let now = now_ms();
        let due_date = parse_due_date(&input.due_date);
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, is_completed, priority, category, due_date, created_at, updated_at, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.is_completed)
        .bind(input.priority)
        .bind(input.category)
        .bind(due_date)
        .bind(now)
        .bind(now)
        .bind(&input.user_id)
        .execute(&*self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, input: UpdateTask) -> Result<u64, TaskError> {
        // SET clause mirrors field presence; updated_at is always refreshed.
        let mut assignments: Vec<&str> = Vec::new();
        if input.title.is_some() {
            assignments.push("title = ?");
        }
        if input.description.is_some() {
            assignments.push("description = ?");
        }
        if input.is_completed.is_some() {
            assignments.push("is_completed = ?");
        }
        if input.priority.is_some() {
            assignments.push("priority = ?");
        }
        if input.category.is_some() {
            assignments.push("category = ?");
        }
        if input.due_date.is_some() {
            assignments.push("due_date = ?");
        }
        assignments.push("updated_at = ?");

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", assignments.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(title) = &input.title {
            query = query.bind(title);
        }
        if let Some(description) = &input.description {
            query = query.bind(description);
        }
        if let Some(completed) = input.is_completed {
            query = query.bind(completed);
        }
        if let Some(priority) = input.priority {
            query = query.bind(priority);
        }
        if let Some(category) = input.category {
            query = query.bind(category);
        }
        if let Some(raw) = &input.due_date {
            query = query.bind(parse_due_date(raw));
        }

        let result = query.bind(now_ms()).bind(id).execute(&*self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<u64, TaskError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn batch_delete(&self, ids: &[i64]) -> Result<u64, TaskError> {
        let sql = format!("DELETE FROM tasks WHERE id IN ({})", placeholders(ids.len()));
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let result = query.execute(&*self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn batch_update_status(&self, ids: &[i64], is_completed: bool) -> Result<u64, TaskError> {
        let sql = format!(
            "UPDATE tasks SET is_completed = ?, updated_at = ? WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql).bind(is_completed).bind(now_ms());
        for id in ids {
            query = query.bind(id);
        }
        let result = query.execute(&*self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_completed(&self) -> Result<u64, TaskError> {
        let result = sqlx::query("DELETE FROM tasks WHERE is_completed = 1")
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn row_to_task(row: &SqliteRow) -> Result<Task, sqlx::Error> {
    Ok(Task {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        is_completed: row.try_get("is_completed")?,
        priority: row.try_get("priority")?,
        category: row.try_get("category")?,
        due_date: row.try_get("due_date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        user_id: row.try_get("user_id")?,
    })
}
