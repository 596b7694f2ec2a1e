//! SQL shared by the experience, project and certification tables. Table and column
//! names passed here are compile-time constants, never request data.

use serde::Serialize;
use sqlx::{
    postgres::PgRow, types::Json, Encode, FromRow, PgExecutor, PgPool, Postgres, QueryBuilder, Type,
};

use crate::entities::option_fields::OptionField;

pub const LIST_ORDER: &str = "ORDER BY sort_order ASC, created_at DESC, id DESC";

pub async fn list_rows<'e, E, T>(executor: E, table: &str, active_only: bool) -> Result<Vec<T>, sqlx::Error>
where
    E: PgExecutor<'e>,
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let filter = if active_only { " WHERE is_active = TRUE" } else { "" };
    let sql = format!("SELECT * FROM {table}{filter} {LIST_ORDER}");

    sqlx::query_as::<_, T>(&sql).fetch_all(executor).await
}

pub async fn get_row<T>(pool: &PgPool, table: &str, id: i32, active_only: bool) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let filter = if active_only { " AND is_active = TRUE" } else { "" };
    let sql = format!("SELECT * FROM {table} WHERE id = $1{filter}");

    sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(pool).await
}

pub async fn delete_row(pool: &PgPool, table: &str, id: i32) -> Result<bool, sqlx::Error> {
    let sql = format!("DELETE FROM {table} WHERE id = $1");
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Flips a boolean column in a single statement.
pub async fn toggle_column<T>(pool: &PgPool, table: &str, column: &str, id: i32) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = format!(
        "UPDATE {table} SET {column} = NOT {column}, updated_at = NOW() WHERE id = $1 RETURNING *"
    );
    sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(pool).await
}

pub async fn delete_all<'e, E>(executor: E, table: &str) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!("DELETE FROM {table}");
    let result = sqlx::query(&sql).execute(executor).await?;
    Ok(result.rows_affected())
}

/// Builds `UPDATE <table> SET ... WHERE id = $n RETURNING *` from patch fields.
/// Absent fields are skipped; `updated_at` is always bumped.
pub struct UpdateBuilder {
    builder: QueryBuilder<'static, Postgres>,
}

impl UpdateBuilder {
    pub fn new(table: &str) -> Self {
        UpdateBuilder {
            builder: QueryBuilder::new(format!("UPDATE {table} SET updated_at = NOW()")),
        }
    }

    fn assign(&mut self, column: &str) -> &mut QueryBuilder<'static, Postgres> {
        self.builder.push(format!(", {column} = "))
    }

    /// Nullable text column: `null` stores NULL.
    pub fn text(&mut self, column: &str, field: &OptionField<String>) -> &mut Self {
        match field {
            OptionField::Unchanged => {}
            OptionField::SetToNull => {
                self.assign(column).push("NULL");
            }
            OptionField::SetToValue(value) => {
                self.assign(column).push_bind(value.clone());
            }
        }
        self
    }

    /// NOT NULL text column, always written. Validation has already rejected blanks.
    pub fn required_text(&mut self, column: &str, value: &str) -> &mut Self {
        self.assign(column).push_bind(value.trim().to_string());
        self
    }

    /// JSONB list column: `null` resets to `[]`.
    pub fn list<T>(&mut self, column: &str, field: &OptionField<Vec<T>>) -> &mut Self
    where
        T: Serialize + Clone + Send + Sync + 'static,
    {
        match field {
            OptionField::Unchanged => {}
            OptionField::SetToNull => {
                self.assign(column).push("'[]'::jsonb");
            }
            OptionField::SetToValue(values) => {
                self.assign(column).push_bind(Json(values.clone()));
            }
        }
        self
    }

    /// NOT NULL scalar column; `null` leaves it unchanged.
    pub fn scalar<T>(&mut self, column: &str, field: &OptionField<T>) -> &mut Self
    where
        T: for<'q> Encode<'q, Postgres> + Type<Postgres> + Copy + Send + 'static,
    {
        if let OptionField::SetToValue(value) = field {
            self.assign(column).push_bind(*value);
        }
        self
    }

    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    pub async fn fetch<T>(mut self, pool: &PgPool, id: i32) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        self.builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
        self.builder.build_query_as::<T>().fetch_optional(pool).await
    }
}
