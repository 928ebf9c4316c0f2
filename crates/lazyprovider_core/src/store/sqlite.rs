//! SQLite implementation of [`BackingStore`].
//!
//! # Responsibility
//! - Translate table-level CRUD calls into parameterized SQL.
//! - Decode result rows into `ColumnValue` cells.
//!
//! # Invariants
//! - Table and column names are always emitted as quoted identifiers.
//! - Values and selection arguments are always bound, never inlined.
//! - `selection`, `group_by`, `having` and `sort_order` are raw SQL fragments
//!   supplied by the caller.

use crate::model::values::{ColumnValue, ContentValues, ResultSet};
use crate::store::{BackingStore, StoreError, StoreQuery, StoreResult};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};

/// SQLite-backed table store.
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        self.conn
    }
}

impl BackingStore for SqliteStore<'_> {
    fn insert(&self, table: &str, values: &ContentValues) -> StoreResult<Option<i64>> {
        let sql = build_insert_sql(table, values)?;
        let binds: Vec<Value> = values.iter().map(|(_, value)| to_sql_value(value)).collect();
        self.conn.execute(&sql, params_from_iter(binds))?;
        Ok(Some(self.conn.last_insert_rowid()))
    }

    fn update(
        &self,
        table: &str,
        values: &ContentValues,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> StoreResult<usize> {
        let sql = build_update_sql(table, values, selection)?;
        let mut binds: Vec<Value> = values.iter().map(|(_, value)| to_sql_value(value)).collect();
        binds.extend(selection_args.iter().map(|arg| Value::Text((*arg).to_string())));
        let changed = self.conn.execute(&sql, params_from_iter(binds))?;
        Ok(changed)
    }

    fn delete(
        &self,
        table: &str,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> StoreResult<usize> {
        let mut sql = format!("DELETE FROM {}", quote_identifier(table)?);
        push_clause(&mut sql, "WHERE", selection);
        let changed = self
            .conn
            .execute(&sql, params_from_iter(selection_args.iter()))?;
        Ok(changed)
    }

    fn query(&self, table: &str, query: &StoreQuery<'_>) -> StoreResult<ResultSet> {
        let sql = build_select_sql(table, query)?;
        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.query(params_from_iter(query.selection_args.iter()))?;
        let mut result = ResultSet {
            columns,
            rows: Vec::new(),
        };
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(result.columns.len());
            for index in 0..result.columns.len() {
                cells.push(from_value_ref(row.get_ref(index)?)?);
            }
            result.rows.push(cells);
        }

        Ok(result)
    }
}

fn build_insert_sql(table: &str, values: &ContentValues) -> StoreResult<String> {
    let table = quote_identifier(table)?;
    if values.is_empty() {
        return Ok(format!("INSERT INTO {table} DEFAULT VALUES"));
    }

    let columns = values
        .iter()
        .map(|(column, _)| quote_identifier(column))
        .collect::<StoreResult<Vec<_>>>()?;
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    ))
}

fn build_update_sql(
    table: &str,
    values: &ContentValues,
    selection: Option<&str>,
) -> StoreResult<String> {
    if values.is_empty() {
        return Err(StoreError::EmptyValues {
            table: table.to_string(),
        });
    }

    let assignments = values
        .iter()
        .map(|(column, _)| quote_identifier(column).map(|column| format!("{column} = ?")))
        .collect::<StoreResult<Vec<_>>>()?;
    let mut sql = format!(
        "UPDATE {} SET {}",
        quote_identifier(table)?,
        assignments.join(", ")
    );
    push_clause(&mut sql, "WHERE", selection);
    Ok(sql)
}

fn build_select_sql(table: &str, query: &StoreQuery<'_>) -> StoreResult<String> {
    let columns = match query.projection {
        Some(projection) if !projection.is_empty() => projection
            .iter()
            .map(|column| render_projection(column))
            .collect::<StoreResult<Vec<_>>>()?
            .join(", "),
        _ => "*".to_string(),
    };

    let mut sql = format!("SELECT {columns} FROM {}", quote_identifier(table)?);
    push_clause(&mut sql, "WHERE", query.selection);
    push_clause(&mut sql, "GROUP BY", query.group_by);
    push_clause(&mut sql, "HAVING", query.having);
    push_clause(&mut sql, "ORDER BY", query.sort_order);
    Ok(sql)
}

fn push_clause(sql: &mut String, keyword: &str, fragment: Option<&str>) {
    if let Some(fragment) = fragment.map(str::trim).filter(|value| !value.is_empty()) {
        sql.push(' ');
        sql.push_str(keyword);
        sql.push(' ');
        sql.push_str(fragment);
    }
}

fn quote_identifier(name: &str) -> StoreResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidColumn(name.to_string()));
    }
    Ok(format!("\"{}\"", trimmed.replace('"', "\"\"")))
}

// Plain column names are quoted; expressions such as `COUNT(*)` pass through.
fn render_projection(column: &str) -> StoreResult<String> {
    let trimmed = column.trim();
    if is_plain_identifier(trimmed) {
        quote_identifier(trimmed)
    } else if trimmed.is_empty() {
        Err(StoreError::InvalidColumn(column.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

fn is_plain_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn to_sql_value(value: &ColumnValue) -> Value {
    match value {
        ColumnValue::Null => Value::Null,
        ColumnValue::Integer(value) => Value::Integer(*value),
        ColumnValue::Real(value) => Value::Real(*value),
        ColumnValue::Text(value) => Value::Text(value.clone()),
        ColumnValue::Blob(value) => Value::Blob(value.clone()),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> StoreResult<ColumnValue> {
    Ok(match value {
        ValueRef::Null => ColumnValue::Null,
        ValueRef::Integer(value) => ColumnValue::Integer(value),
        ValueRef::Real(value) => ColumnValue::Real(value),
        ValueRef::Text(bytes) => ColumnValue::Text(
            String::from_utf8(bytes.to_vec())
                .map_err(|err| StoreError::InvalidData(format!("non UTF-8 text cell: {err}")))?,
        ),
        ValueRef::Blob(bytes) => ColumnValue::Blob(bytes.to_vec()),
    })
}
