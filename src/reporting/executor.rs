use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Executor, Row, Statement, TypeInfo, ValueRef};

use crate::domain::report::ReportOutput;
use crate::reporting::ReportResult;

/// Date-time columns are rendered as `2024-01-15T10:30:00`, with a fraction only when non-zero.
const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f";
const ISO_DATE: &str = "%Y-%m-%d";
const ISO_TIME: &str = "%H:%M:%S%.f";

/// Runs report queries against the reporting database.
///
/// A new connection is opened for every query and closed before returning.
#[derive(Debug, Clone)]
pub struct ReportExecutor {
    database_url: String,
}

impl ReportExecutor {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Execute `sql`, binding `params` positionally as text.
    pub async fn execute(&self, sql: &str, params: &[String]) -> ReportResult<ReportOutput> {
        let mut conn = SqliteConnection::connect(&self.database_url).await?;

        let result = run_query(&mut conn, sql, params).await;

        if let Err(err) = conn.close().await {
            log::warn!("Failed to close reporting connection: {err}");
        }

        result
    }

    /// Execute caller-supplied SQL without parameters.
    pub async fn execute_ad_hoc(&self, sql: &str) -> ReportResult<ReportOutput> {
        self.execute(sql, &[]).await
    }
}

async fn run_query(
    conn: &mut SqliteConnection,
    sql: &str,
    params: &[String],
) -> ReportResult<ReportOutput> {
    let statement = (&mut *conn).prepare(sql).await?;

    let columns: Vec<String> = statement
        .columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect();

    let mut query = statement.query();
    for param in params {
        query = query.bind(param.clone());
    }

    let fetched = query.fetch_all(&mut *conn).await?;

    let mut rows = Vec::with_capacity(fetched.len());
    for row in &fetched {
        rows.push(normalize_row(row, &columns)?);
    }

    Ok(ReportOutput {
        columns,
        rows,
        project: None,
    })
}

fn normalize_row(row: &SqliteRow, columns: &[String]) -> ReportResult<Map<String, Value>> {
    let mut object = Map::with_capacity(columns.len());

    for (index, name) in columns.iter().enumerate() {
        object.insert(name.clone(), normalize_cell(row, index)?);
    }

    Ok(object)
}

/// Convert one cell into JSON, rendering temporal values as ISO 8601 text.
fn normalize_cell(row: &SqliteRow, index: usize) -> ReportResult<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();

    let declared = row
        .columns()
        .get(index)
        .map(|column| column.type_info().name().to_uppercase())
        .unwrap_or_default();

    let temporal = match declared.as_str() {
        "DATETIME" | "TIMESTAMP" => row
            .try_get::<NaiveDateTime, _>(index)
            .ok()
            .map(|value| value.format(ISO_DATETIME).to_string()),
        "DATE" => row
            .try_get::<NaiveDate, _>(index)
            .ok()
            .map(|value| value.format(ISO_DATE).to_string()),
        "TIME" => row
            .try_get::<NaiveTime, _>(index)
            .ok()
            .map(|value| value.format(ISO_TIME).to_string()),
        _ => None,
    };
    if let Some(text) = temporal {
        return Ok(Value::String(text));
    }

    let value = match storage.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(index)?),
        "REAL" => Number::from_f64(row.try_get::<f64, _>(index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => Value::from(row.try_get::<Vec<u8>, _>(index)?),
        _ => Value::String(row.try_get::<String, _>(index)?),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::ReportError;

    struct ReportingDb {
        _dir: tempfile::TempDir,
        url: String,
    }

    async fn reporting_db() -> ReportingDb {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = format!("sqlite://{}", dir.path().join("reporting.db").display());

        let mut conn = SqliteConnection::connect(&format!("{url}?mode=rwc"))
            .await
            .expect("create reporting db");
        sqlx::raw_sql(
            "CREATE TABLE stock (
                id INTEGER PRIMARY KEY,
                project_code TEXT NOT NULL,
                material TEXT NOT NULL,
                quantity REAL NOT NULL,
                received_at DATETIME,
                expires_on DATE,
                cutoff TIME,
                label BLOB
            );
            INSERT INTO stock (project_code, material, quantity, received_at, expires_on, cutoff, label)
            VALUES
                ('ACME01', 'Gloves', 12.5, '2024-01-15 10:30:00', '2025-06-30', '17:45:00', X'0102'),
                ('ACME01', 'Masks', 3.0, '2024-02-01 08:00:00.250', NULL, NULL, NULL),
                ('OTHER', 'Boxes', 1.0, NULL, NULL, NULL, NULL);",
        )
        .execute(&mut conn)
        .await
        .expect("seed reporting db");
        conn.close().await.expect("close seed connection");

        ReportingDb { _dir: dir, url }
    }

    #[actix_web::test]
    async fn binds_parameters_and_keeps_column_order() {
        let db = reporting_db().await;
        let executor = ReportExecutor::new(&db.url);

        let output = executor
            .execute(
                "SELECT material, id, quantity FROM stock WHERE project_code = ?1 ORDER BY id",
                &["ACME01".to_string()],
            )
            .await
            .expect("query should succeed");

        assert_eq!(output.columns, vec!["material", "id", "quantity"]);
        assert_eq!(output.rows.len(), 2);

        let keys: Vec<&String> = output.rows[0].keys().collect();
        assert_eq!(keys, vec!["material", "id", "quantity"]);
        assert_eq!(output.rows[0]["material"], Value::from("Gloves"));
        assert_eq!(output.rows[0]["id"], Value::from(1));
        assert_eq!(output.rows[0]["quantity"], Value::from(12.5));
    }

    #[actix_web::test]
    async fn temporal_cells_become_iso_8601() {
        let db = reporting_db().await;
        let executor = ReportExecutor::new(&db.url);

        let output = executor
            .execute_ad_hoc("SELECT received_at, expires_on, cutoff FROM stock ORDER BY id")
            .await
            .expect("query should succeed");

        assert_eq!(output.rows[0]["received_at"], Value::from("2024-01-15T10:30:00"));
        assert_eq!(output.rows[0]["expires_on"], Value::from("2025-06-30"));
        assert_eq!(output.rows[0]["cutoff"], Value::from("17:45:00"));
        assert_eq!(output.rows[1]["received_at"], Value::from("2024-02-01T08:00:00.250"));
        assert_eq!(output.rows[1]["expires_on"], Value::Null);
        assert_eq!(output.rows[2]["received_at"], Value::Null);
    }

    #[actix_web::test]
    async fn non_temporal_cells_pass_through() {
        let db = reporting_db().await;
        let executor = ReportExecutor::new(&db.url);

        let output = executor
            .execute_ad_hoc("SELECT label, project_code FROM stock WHERE id = 1")
            .await
            .expect("query should succeed");

        assert_eq!(output.rows[0]["label"], Value::from(vec![1u8, 2u8]));
        assert_eq!(output.rows[0]["project_code"], Value::from("ACME01"));
    }

    #[actix_web::test]
    async fn empty_result_still_reports_columns() {
        let db = reporting_db().await;
        let executor = ReportExecutor::new(&db.url);

        let output = executor
            .execute(
                "SELECT id, material FROM stock WHERE project_code = ?1",
                &["NOPE".to_string()],
            )
            .await
            .expect("query should succeed");

        assert_eq!(output.columns, vec!["id", "material"]);
        assert!(output.rows.is_empty());
    }

    #[actix_web::test]
    async fn invalid_sql_is_a_database_error() {
        let db = reporting_db().await;
        let executor = ReportExecutor::new(&db.url);

        let result = executor.execute_ad_hoc("SELEC nonsense").await;

        assert!(matches!(result, Err(ReportError::Database(_))));
    }
}
