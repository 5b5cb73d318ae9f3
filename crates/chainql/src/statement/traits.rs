use crate::client::GenericClient;
use crate::config::ExecConfig;
use crate::error::SqlResult;
use crate::model::{Model, TableRef};
use crate::sql::Sql;
use tokio_postgres::Row;

use super::exec;

/// A stage that can render itself, and everything before it, as SQL.
///
/// Object safe, so stages can walk back up the chain through
/// `&dyn Statement`.
pub trait Statement {
    /// Render into `sql`, binding values as placeholders.
    fn append_to(&self, sql: &mut Sql);

    /// Render into a fresh buffer.
    fn build(&self) -> Sql {
        let mut sql = Sql::empty();
        self.append_to(&mut sql);
        sql
    }

    /// Rendered text with `$n` placeholders.
    fn to_sql(&self) -> String {
        self.build().to_sql()
    }

    fn param_count(&self) -> usize {
        self.build().param_count()
    }
}

/// A stage a WHERE clause can be attached to.
pub trait WhereBase: Statement {
    /// Entity the statement targets.
    type Model: Model;

    fn table(&self) -> TableRef {
        TableRef::of::<Self::Model>()
    }

    /// The stage this one was built on (for SET, the `UPDATE` root).
    fn base_statement(&self) -> &dyn Statement;
}

/// A statement that can be sent to the database.
pub trait Mutation: Statement + Sync {
    /// Check builder state before anything is executed.
    fn validate(&self) -> SqlResult<()>;

    /// Whether the statement carries WHERE conditions.
    fn has_where(&self) -> bool {
        false
    }

    /// Execute with default settings and return the affected row count.
    fn execute(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send {
        async move {
            let config = ExecConfig::default();
            exec::execute(self, conn, &config).await
        }
    }

    /// Execute with `config` and return the affected row count.
    fn execute_with(
        &self,
        conn: &impl GenericClient,
        config: &ExecConfig,
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send {
        exec::execute(self, conn, config)
    }

    /// Execute and return the rows produced by `RETURNING`.
    fn fetch_returning(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Vec<Row>>> + Send {
        async move {
            let config = ExecConfig::default();
            exec::fetch(self, conn, &config).await
        }
    }

    /// Execute and return the first `RETURNING` row.
    ///
    /// Returns [`SqlError::NotFound`](crate::SqlError::NotFound) when the
    /// update matched nothing.
    fn fetch_one_returning(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Row>> + Send {
        async move {
            let config = ExecConfig::default();
            exec::fetch_one(self, conn, &config).await
        }
    }

    /// Execute and return the first `RETURNING` row, if any.
    fn fetch_opt_returning(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Option<Row>>> + Send {
        async move {
            let config = ExecConfig::default();
            exec::fetch_opt(self, conn, &config).await
        }
    }

    /// [`Mutation::fetch_returning`] with `config`.
    fn fetch_returning_with(
        &self,
        conn: &impl GenericClient,
        config: &ExecConfig,
    ) -> impl std::future::Future<Output = SqlResult<Vec<Row>>> + Send {
        exec::fetch(self, conn, config)
    }
}
