//! Department repository implementation

use sqlx::PgPool;

use crate::models::department::Department;
use crate::utils::errors::EventBoardError;

#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new department
    pub async fn create(&self, name: &str, color: &str) -> Result<Department, EventBoardError> {
        let department = sqlx::query_as::<_, Department>(
            "INSERT INTO departments (name, color) VALUES ($1, $2) RETURNING id, name, color",
        )
        .bind(name)
        .bind(color)
        .fetch_one(&self.pool)
        .await?;

        Ok(department)
    }

    /// Find department by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Department>, EventBoardError> {
        let department =
            sqlx::query_as::<_, Department>("SELECT id, name, color FROM departments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(department)
    }

    /// Find departments by ID list (unordered; callers re-order as needed)
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Department>, EventBoardError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let departments = sqlx::query_as::<_, Department>(
            "SELECT id, name, color FROM departments WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(departments)
    }

    /// List all departments
    pub async fn find_all(&self) -> Result<Vec<Department>, EventBoardError> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, name, color FROM departments ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(departments)
    }
}
