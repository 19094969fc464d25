//! Insert/update/delete against an arbitrary table.
//!
//! Statements are built from the runtime schema: identifiers are quoted,
//! values are always bound parameters. Each statement runs on its own in
//! SQLite's auto-commit mode.

use crate::db::{quote_identifier, Database};
use crate::error::{CrudError, ValidationError};
use crate::schema::TableSchema;

/// Answer to the "delete this row?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOutcome {
    Completed { affected: usize },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Insert,
    Update,
    Delete,
}

impl MutationKind {
    pub fn label(&self) -> &'static str {
        match self {
            MutationKind::Insert => "insert",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

/// Reject values whose primary-key cell is empty.
pub fn validate_primary_key(schema: &TableSchema, values: &[String]) -> Result<(), ValidationError> {
    let key = values
        .get(schema.primary_key_index)
        .map(String::as_str)
        .unwrap_or_default();
    if key.is_empty() {
        return Err(ValidationError {
            column: schema.identity_column().to_string(),
        });
    }
    Ok(())
}

pub fn insert_statement(schema: &TableSchema) -> String {
    let columns = schema
        .columns
        .iter()
        .map(|c| quote_identifier(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=schema.columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders})",
        quote_identifier(&schema.name)
    )
}

/// The identity value binds to the last placeholder.
pub fn update_statement(schema: &TableSchema) -> String {
    let all: Vec<usize> = (0..schema.columns.len()).collect();
    update_columns_statement(schema, &all)
}

/// UPDATE assigning only `columns`, bound in the given order.
pub fn update_columns_statement(schema: &TableSchema, columns: &[usize]) -> String {
    let assignments = columns
        .iter()
        .filter_map(|&i| schema.columns.get(i))
        .enumerate()
        .map(|(n, c)| format!("{} = ?{}", quote_identifier(&c.name), n + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE {} = ?{}",
        quote_identifier(&schema.name),
        quote_identifier(schema.identity_column()),
        columns.len() + 1
    )
}

/// Columns whose value differs from the row as it was fetched.
///
/// Fetched cells are display text (NULL as "", BLOB as "<N bytes>"), so an
/// untouched cell must never be written back.
pub fn changed_columns(values: &[String], original: &[String]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(i, v)| original.get(*i) != Some(*v))
        .map(|(i, _)| i)
        .collect()
}

pub fn delete_statement(schema: &TableSchema) -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?1",
        quote_identifier(&schema.name),
        quote_identifier(schema.identity_column())
    )
}

#[derive(Debug, Clone)]
pub struct CrudExecutor {
    db: Database,
}

impl CrudExecutor {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self, schema, values), fields(table = %schema.name))]
    pub async fn insert(
        &self,
        schema: &TableSchema,
        values: Vec<String>,
    ) -> Result<CrudOutcome, CrudError> {
        validate_primary_key(schema, &values)?;
        let affected = self.db.execute(&insert_statement(schema), values).await?;
        tracing::info!(affected, "row inserted");
        Ok(CrudOutcome::Completed { affected })
    }

    /// `identity` is the key value the row had when the form was opened, so a
    /// row whose key is itself being edited is still found.
    #[tracing::instrument(skip(self, schema, values), fields(table = %schema.name))]
    pub async fn update(
        &self,
        schema: &TableSchema,
        values: Vec<String>,
        identity: String,
    ) -> Result<CrudOutcome, CrudError> {
        validate_primary_key(schema, &values)?;
        let mut params = values;
        params.push(identity);
        let affected = self.db.execute(&update_statement(schema), params).await?;
        tracing::info!(affected, "row updated");
        Ok(CrudOutcome::Completed { affected })
    }

    /// Update only the cells that differ from `original`. With nothing
    /// changed no statement runs.
    #[tracing::instrument(skip(self, schema, values, original), fields(table = %schema.name))]
    pub async fn update_changed(
        &self,
        schema: &TableSchema,
        values: Vec<String>,
        original: &[String],
        identity: String,
    ) -> Result<CrudOutcome, CrudError> {
        validate_primary_key(schema, &values)?;
        let columns = changed_columns(&values, original);
        if columns.is_empty() {
            tracing::debug!("no cells changed, nothing to update");
            return Ok(CrudOutcome::Completed { affected: 0 });
        }
        let mut params: Vec<String> = columns.iter().map(|&i| values[i].clone()).collect();
        params.push(identity);
        let affected = self
            .db
            .execute(&update_columns_statement(schema, &columns), params)
            .await?;
        tracing::info!(affected, columns = columns.len(), "row updated");
        Ok(CrudOutcome::Completed { affected })
    }

    #[tracing::instrument(skip(self, schema), fields(table = %schema.name))]
    pub async fn delete(
        &self,
        schema: &TableSchema,
        identity: String,
        confirmation: Confirmation,
    ) -> Result<CrudOutcome, CrudError> {
        if confirmation == Confirmation::Cancel {
            tracing::debug!("delete cancelled");
            return Ok(CrudOutcome::Cancelled);
        }
        let affected = self
            .db
            .execute(&delete_statement(schema), vec![identity])
            .await?;
        tracing::info!(affected, "row deleted");
        Ok(CrudOutcome::Completed { affected })
    }
}
