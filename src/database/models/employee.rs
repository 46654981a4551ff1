use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Employee as seen by the mobile API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Employee id, e.g. `EMP-001`
    pub name: String,
    /// Login identity mapped to this employee
    pub user_id: String,
    pub employee_name: Option<String>,
    pub company: Option<String>,
}
