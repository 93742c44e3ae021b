use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub priority: i64,
    pub category: i64,
    pub due_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default = "default_category")]
    pub category: i64,
    // Raw wire value; the repository runs it through due_date::parse_due_date.
    #[serde(default)]
    pub due_date: Value,
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_priority() -> i64 {
    1
}

fn default_category() -> i64 {
    4
}

impl Default for CreateTask {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            is_completed: false,
            priority: default_priority(),
            category: default_category(),
            due_date: Value::Null,
            user_id: None,
        }
    }
}

/// Partial update. A field is written only when its key is present in the
/// request body; `description` and `due_date` track presence separately from
/// the value so an explicit null clears the column while an omitted key
/// leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Value>,
}

// Wraps whatever the key holds (null included) in Some, so only a missing
// key deserializes to None.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub is_completed: Option<bool>,
    pub priority: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskExport {
    pub version: String,
    pub export_date: String,
    pub tasks: Vec<Task>,
}
