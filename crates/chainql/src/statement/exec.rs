//! Shared execution path for [`Mutation`] statements.

use super::traits::Mutation;
use crate::client::GenericClient;
use crate::config::ExecConfig;
use crate::error::{SqlError, SqlResult};
use crate::sql::Sql;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_postgres::Row;

/// Validate, then render. Nothing reaches the database on failure.
pub(crate) fn prepare<S>(stmt: &S, config: &ExecConfig) -> SqlResult<Sql>
where
    S: Mutation + ?Sized,
{
    stmt.validate()?;
    if config.require_where && !stmt.has_where() {
        return Err(SqlError::validation(
            "UPDATE has no WHERE conditions and require_where is set",
        ));
    }
    Ok(stmt.build())
}

pub(crate) async fn execute<S, C>(stmt: &S, conn: &C, config: &ExecConfig) -> SqlResult<u64>
where
    S: Mutation + ?Sized,
    C: GenericClient,
{
    let sql = prepare(stmt, config)?;
    let text = sql.to_sql();
    let params = sql.params_ref();

    log_start(config, &text, params.len());
    let started = Instant::now();
    let result = with_timeout(config.timeout, conn.execute(&text, &params)).await;
    log_finish(config, started, result.as_ref().map(|n| *n));
    result
}

pub(crate) async fn fetch<S, C>(stmt: &S, conn: &C, config: &ExecConfig) -> SqlResult<Vec<Row>>
where
    S: Mutation + ?Sized,
    C: GenericClient,
{
    let sql = prepare(stmt, config)?;
    let text = sql.to_sql();
    let params = sql.params_ref();

    log_start(config, &text, params.len());
    let started = Instant::now();
    let result = with_timeout(config.timeout, conn.query(&text, &params)).await;
    log_finish(config, started, result.as_ref().map(|rows| rows.len() as u64));
    result
}

pub(crate) async fn fetch_one<S, C>(stmt: &S, conn: &C, config: &ExecConfig) -> SqlResult<Row>
where
    S: Mutation + ?Sized,
    C: GenericClient,
{
    let sql = prepare(stmt, config)?;
    let text = sql.to_sql();
    let params = sql.params_ref();

    log_start(config, &text, params.len());
    let started = Instant::now();
    let result = with_timeout(config.timeout, conn.query_one(&text, &params)).await;
    log_finish(config, started, result.as_ref().map(|_| 1));
    result
}

pub(crate) async fn fetch_opt<S, C>(
    stmt: &S,
    conn: &C,
    config: &ExecConfig,
) -> SqlResult<Option<Row>>
where
    S: Mutation + ?Sized,
    C: GenericClient,
{
    let sql = prepare(stmt, config)?;
    let text = sql.to_sql();
    let params = sql.params_ref();

    log_start(config, &text, params.len());
    let started = Instant::now();
    let result = with_timeout(config.timeout, conn.query_opt(&text, &params)).await;
    log_finish(
        config,
        started,
        result.as_ref().map(|row| u64::from(row.is_some())),
    );
    result
}

async fn with_timeout<T, F>(timeout: Option<Duration>, fut: F) -> SqlResult<T>
where
    F: Future<Output = SqlResult<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| SqlError::Timeout(limit))?,
        None => fut.await,
    }
}

#[cfg(feature = "tracing")]
fn log_start(config: &ExecConfig, sql: &str, params: usize) {
    let sql = crate::config::truncate_sql(sql, config.max_sql_log_len);
    tracing::debug!(
        target: "chainql.sql",
        tag = config.tag.as_deref().unwrap_or("-"),
        params,
        sql = %sql,
        "executing statement"
    );
}

#[cfg(feature = "tracing")]
fn log_finish(config: &ExecConfig, started: Instant, outcome: Result<u64, &SqlError>) {
    let tag = config.tag.as_deref().unwrap_or("-");
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(rows) => tracing::debug!(target: "chainql.sql", tag, rows, elapsed_ms, "statement finished"),
        Err(err) => tracing::warn!(target: "chainql.sql", tag, elapsed_ms, error = %err, "statement failed"),
    }
}

#[cfg(not(feature = "tracing"))]
fn log_start(_config: &ExecConfig, _sql: &str, _params: usize) {}

#[cfg(not(feature = "tracing"))]
fn log_finish(_config: &ExecConfig, _started: Instant, _outcome: Result<u64, &SqlError>) {}
