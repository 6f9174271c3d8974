//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the record store facade over the `employees` table.
//! - Translate typed filters/updates into parameterized SQL.
//!
//! # Invariants
//! - Write paths validate records/updates before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - "Not found" on reads is `Ok(None)`, never an error.
//! - `*_one` operations act on the first match in insertion order.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeId, EmployeeValidationError};
use crate::model::query::{EmployeeFilter, EmployeeUpdate};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    uuid,
    first_name,
    last_name,
    department
FROM employees";

const REQUIRED_COLUMNS: [&str; 4] = ["uuid", "first_name", "last_name", "department"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record or update failed boundary validation.
    Validation(EmployeeValidationError),
    /// Underlying SQLite/bootstrap error, propagated unchanged.
    Db(DbError),
    /// No stored record has this identity.
    NotFound(EmployeeId),
    /// Operation needs a persisted record but got one without identity.
    Unsaved,
    /// Insert was given a record that already carries an identity.
    AlreadyPersisted(EmployeeId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::Unsaved => write!(f, "employee has not been saved yet"),
            Self::AlreadyPersisted(id) => write!(f, "employee already persisted: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "employee repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "employee repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "employee repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::Unsaved
            | Self::AlreadyPersisted(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store facade for employee CRUD operations.
pub trait EmployeeRepository {
    /// Persists a new record and returns it with its assigned identity.
    fn insert(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Returns every record matching `filter`.
    fn find_all(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>>;
    /// Returns the first record matching `filter`, if any.
    fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>>;
    /// Returns the record with `id`, if it still exists.
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Returns how many records match `filter`.
    fn count(&self, filter: &EmployeeFilter) -> RepoResult<usize>;
    /// Applies `changes` to at most one matching record; returns rows affected.
    fn update_one(&self, filter: &EmployeeFilter, changes: &EmployeeUpdate) -> RepoResult<usize>;
    /// Applies `changes` to every matching record; returns rows affected.
    fn update_many(&self, filter: &EmployeeFilter, changes: &EmployeeUpdate)
        -> RepoResult<usize>;
    /// Writes the full state of a persisted record under its identity.
    fn replace(&self, employee: &Employee) -> RepoResult<()>;
    /// Removes at most one matching record; returns rows affected.
    fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<usize>;
    /// Removes every matching record; returns rows affected.
    fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<usize>;
    /// Removes the record with `id`; `false` when it was already gone.
    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<bool>;
}

/// SQLite-backed employee repository.
///
/// Borrows a caller-owned connection; the store closes when the caller
/// drops that connection.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert(&self, employee: &Employee) -> RepoResult<Employee> {
        if let Some(id) = employee.id {
            return Err(RepoError::AlreadyPersisted(id));
        }
        employee.validate()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO employees (uuid, first_name, last_name, department)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.department.as_str(),
            ],
        )?;

        let mut persisted = employee.clone();
        persisted.id = Some(id);
        Ok(persisted)
    }

    fn find_all(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        let (where_sql, bind_values) = filter_clause(filter);
        self.query_employees(
            &format!("{EMPLOYEE_SELECT_SQL}{where_sql} ORDER BY rowid ASC;"),
            bind_values,
        )
    }

    fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        let (where_sql, bind_values) = filter_clause(filter);
        let mut found = self.query_employees(
            &format!("{EMPLOYEE_SELECT_SQL}{where_sql} ORDER BY rowid ASC LIMIT 1;"),
            bind_values,
        )?;
        Ok(found.pop())
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut found = self.query_employees(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE uuid = ?;"),
            vec![Value::Text(id.to_string())],
        )?;
        Ok(found.pop())
    }

    fn count(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let (where_sql, bind_values) = filter_clause(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM employees{where_sql};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative employee count `{count}`")))
    }

    fn update_one(&self, filter: &EmployeeFilter, changes: &EmployeeUpdate) -> RepoResult<usize> {
        changes.validate()?;
        if changes.is_empty() {
            return Ok(0);
        }

        let (set_sql, mut bind_values) = set_clause(changes);
        let (where_sql, filter_values) = filter_clause(filter);
        bind_values.extend(filter_values);

        let changed = self.conn.execute(
            &format!(
                "UPDATE employees SET {set_sql}
                 WHERE rowid = (SELECT rowid FROM employees{where_sql} ORDER BY rowid ASC LIMIT 1);"
            ),
            params_from_iter(bind_values),
        )?;
        Ok(changed)
    }

    fn update_many(
        &self,
        filter: &EmployeeFilter,
        changes: &EmployeeUpdate,
    ) -> RepoResult<usize> {
        changes.validate()?;
        if changes.is_empty() {
            return Ok(0);
        }

        let (set_sql, mut bind_values) = set_clause(changes);
        let (where_sql, filter_values) = filter_clause(filter);
        bind_values.extend(filter_values);

        let changed = self.conn.execute(
            &format!("UPDATE employees SET {set_sql}{where_sql};"),
            params_from_iter(bind_values),
        )?;
        Ok(changed)
    }

    fn replace(&self, employee: &Employee) -> RepoResult<()> {
        let id = employee.id.ok_or(RepoError::Unsaved)?;
        employee.validate()?;

        let changed = self.conn.execute(
            "UPDATE employees
             SET
                first_name = ?1,
                last_name = ?2,
                department = ?3
             WHERE uuid = ?4;",
            params![
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.department.as_str(),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let (where_sql, bind_values) = filter_clause(filter);
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM employees
                 WHERE rowid = (SELECT rowid FROM employees{where_sql} ORDER BY rowid ASC LIMIT 1);"
            ),
            params_from_iter(bind_values),
        )?;
        Ok(changed)
    }

    fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let (where_sql, bind_values) = filter_clause(filter);
        let changed = self.conn.execute(
            &format!("DELETE FROM employees{where_sql};"),
            params_from_iter(bind_values),
        )?;
        Ok(changed)
    }

    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

impl SqliteEmployeeRepository<'_> {
    fn query_employees(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }
}

/// Builds ` WHERE a = ? AND b = ?` (or an empty string) plus bind values.
fn filter_clause(filter: &EmployeeFilter) -> (String, Vec<Value>) {
    if filter.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut predicates = Vec::new();
    let mut bind_values = Vec::new();
    for (field, value) in filter.conditions() {
        predicates.push(format!("{} = ?", field.as_str()));
        bind_values.push(Value::Text(value.to_string()));
    }

    (format!(" WHERE {}", predicates.join(" AND ")), bind_values)
}

fn set_clause(changes: &EmployeeUpdate) -> (String, Vec<Value>) {
    let mut assignments = Vec::new();
    let mut bind_values = Vec::new();
    for (field, value) in changes.changes() {
        assignments.push(format!("{} = ?", field.as_str()));
        bind_values.push(Value::Text(value.to_string()));
    }

    (assignments.join(", "), bind_values)
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in employees.uuid"))
    })?;

    let employee = Employee::with_id(
        id,
        row.get::<_, String>("first_name")?,
        row.get::<_, String>("last_name")?,
        row.get::<_, String>("department")?,
    )?;
    Ok(employee)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "employees")? {
        return Err(RepoError::MissingRequiredTable("employees"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "employees", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "employees",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{filter_clause, set_clause};
    use crate::model::query::{EmployeeFilter, EmployeeUpdate};

    #[test]
    fn empty_filter_produces_no_where_clause() {
        let (sql, values) = filter_clause(&EmployeeFilter::all());
        assert!(sql.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn filter_clause_binds_values_in_field_order() {
        let filter = EmployeeFilter::all()
            .department("department1")
            .first_name("FirstName1");
        let (sql, values) = filter_clause(&filter);

        assert_eq!(sql, " WHERE first_name = ? AND department = ?");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn set_clause_lists_every_change() {
        let update = EmployeeUpdate::new().last_name("LastName9").first_name("FirstName9");
        let (sql, values) = set_clause(&update);

        assert_eq!(sql, "first_name = ?, last_name = ?");
        assert_eq!(values.len(), 2);
    }
}
