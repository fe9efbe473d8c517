//! Department resolver service
//!
//! Resolves a request/event's one-or-many department associations into
//! ordered department objects. The first entry is the primary department
//! used for display badges.

use crate::database::DatabaseService;
use crate::models::department::Department;
use crate::utils::errors::Result;
use crate::utils::helpers;

#[derive(Debug, Clone)]
pub struct DepartmentService {
    db: DatabaseService,
}

impl DepartmentService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Resolve the department objects for a record, preserving the order
    /// of the id list. Falls back to the scalar id when no list is set.
    pub async fn resolve(
        &self,
        department_id: Option<i64>,
        department_ids: Option<&str>,
    ) -> Result<Vec<Department>> {
        let mut ids = helpers::parse_id_list(department_ids);
        if ids.is_empty() {
            if let Some(id) = department_id {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found = self.db.departments.find_by_ids(&ids).await?;
        let ordered = ids
            .iter()
            .filter_map(|id| found.iter().find(|d| d.id == *id).cloned())
            .collect();

        Ok(ordered)
    }

    /// List all departments
    pub async fn find_all(&self) -> Result<Vec<Department>> {
        self.db.departments.find_all().await
    }

    /// Get one department by id
    pub async fn find_one(&self, id: i64) -> Result<Option<Department>> {
        self.db.departments.find_by_id(id).await
    }
}
