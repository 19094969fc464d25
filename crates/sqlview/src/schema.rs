//! Schema inspection for the active table.

use crate::db::Database;
use crate::error::{DbError, SchemaError};

/// One column as declared in the table definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type (may be empty, SQLite allows untyped columns).
    pub decl_type: String,
    pub is_primary_key: bool,
}

/// Columns of the active table and the column used to address single rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    /// Always a valid index into `columns`; 0 if no primary key is declared,
    /// the first key column for a composite key.
    pub primary_key_index: usize,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        let primary_key_index = columns
            .iter()
            .position(|c| c.is_primary_key)
            .unwrap_or(0);
        Self {
            name: name.into(),
            columns,
            primary_key_index,
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_declared_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.is_primary_key)
    }

    /// Name of the column used in UPDATE/DELETE WHERE clauses.
    ///
    /// Without a declared primary key this is the first column, which is
    /// assumed (not checked) to be unique.
    ///
    /// With a composite primary key only its first column is used, so an
    /// UPDATE or DELETE may match every row sharing that value.
    pub fn identity_column(&self) -> &str {
        self.columns
            .get(self.primary_key_index)
            .map(|c| c.name.as_str())
            .unwrap_or_default()
    }

    /// The identity value of a row, as captured when a form is opened.
    pub fn identity_value<'a>(&self, row: &'a [String]) -> Option<&'a str> {
        row.get(self.primary_key_index).map(String::as_str)
    }
}

/// Discover the columns, primary key and row count of `table`.
#[tracing::instrument(skip(db))]
pub async fn inspect(db: &Database, table: &str) -> Result<(TableSchema, usize), SchemaError> {
    let metadata_err = |e: DbError| SchemaError::Metadata {
        table: table.to_string(),
        message: e.to_string(),
    };

    let columns = db.table_columns(table).await.map_err(metadata_err)?;
    if columns.is_empty() {
        return Err(SchemaError::UnknownTable(table.to_string()));
    }

    let row_count = db.row_count(table).await.map_err(metadata_err)?;
    let schema = TableSchema::new(table, columns);

    tracing::debug!(
        columns = schema.column_count(),
        primary_key = schema.identity_column(),
        row_count,
        "table inspected"
    );
    Ok((schema, row_count))
}
