//! Employee use-case service.
//!
//! # Responsibility
//! - Provide record-level `save`/`remove` on top of the repository facade.
//! - Delegate every query to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Log events carry ids and counts only, never field values.

use crate::model::employee::{Employee, EmployeeId};
use crate::model::query::{EmployeeFilter, EmployeeUpdate};
use crate::repo::employee_repo::{EmployeeRepository, RepoError, RepoResult};
use log::debug;

/// Use-case service wrapper for employee operations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds and inserts a new employee.
    pub fn create_employee(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
    ) -> RepoResult<Employee> {
        self.insert(&Employee::new(first_name, last_name, department))
    }

    pub fn insert(&self, employee: &Employee) -> RepoResult<Employee> {
        let persisted = self.repo.insert(employee)?;
        debug!(
            "event=employee_insert module=service status=ok id={}",
            display_id(persisted.id)
        );
        Ok(persisted)
    }

    /// Persists `employee`, inserting or replacing depending on its state.
    ///
    /// # Contract
    /// - New record: inserted, and the assigned id is written back so
    ///   `employee.is_new()` is `false` afterwards.
    /// - Persisted record: full state replaced under the existing id.
    /// - On error `employee` is left unchanged.
    pub fn save(&self, employee: &mut Employee) -> RepoResult<()> {
        if employee.is_new() {
            let persisted = self.insert(employee)?;
            employee.id = persisted.id;
            return Ok(());
        }

        self.repo.replace(employee)?;
        debug!(
            "event=employee_replace module=service status=ok id={}",
            display_id(employee.id)
        );
        Ok(())
    }

    /// Writes the full state of a previously fetched record.
    pub fn replace(&self, employee: &Employee) -> RepoResult<()> {
        self.repo.replace(employee)
    }

    /// Deletes a previously fetched record by its identity.
    ///
    /// Returns `false` when the record was already removed.
    pub fn remove(&self, employee: &Employee) -> RepoResult<bool> {
        let id = employee.id.ok_or(RepoError::Unsaved)?;
        let removed = self.repo.delete_by_id(id)?;
        debug!("event=employee_remove module=service status=ok id={id} removed={removed}");
        Ok(removed)
    }

    pub fn find_all(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        self.repo.find_all(filter)
    }

    pub fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        self.repo.find_one(filter)
    }

    pub fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.repo.find_by_id(id)
    }

    pub fn count(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        self.repo.count(filter)
    }

    pub fn update_one(&self, filter: &EmployeeFilter, changes: &EmployeeUpdate) -> RepoResult<usize> {
        let affected = self.repo.update_one(filter, changes)?;
        debug!("event=employee_update module=service status=ok scope=one affected={affected}");
        Ok(affected)
    }

    pub fn update_many(
        &self,
        filter: &EmployeeFilter,
        changes: &EmployeeUpdate,
    ) -> RepoResult<usize> {
        let affected = self.repo.update_many(filter, changes)?;
        debug!("event=employee_update module=service status=ok scope=many affected={affected}");
        Ok(affected)
    }

    pub fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let affected = self.repo.delete_one(filter)?;
        debug!("event=employee_delete module=service status=ok scope=one affected={affected}");
        Ok(affected)
    }

    pub fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let affected = self.repo.delete_many(filter)?;
        debug!("event=employee_delete module=service status=ok scope=many affected={affected}");
        Ok(affected)
    }
}

fn display_id(id: Option<EmployeeId>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}
