//! # chainql
//!
//! Stage-chained, parameter-safe `UPDATE ... SET ... WHERE` statements for
//! PostgreSQL.
//!
//! ## Features
//!
//! - **Typed stages**: `Update<M>`, `Set<M>` and `Where<Set<M>>` are tied to a
//!   [`Model`], so conditions for one table cannot leak into another
//! - **Placeholders managed for you**: values bind as `$1, $2, ...` across
//!   every stage
//! - **Validated identifiers**: table and column names go through [`Ident`]
//! - **Permissive rendering, strict execution**: any stage renders at any
//!   time; an empty SET list is only rejected when executed
//!
//! ```ignore
//! use chainql::{Condition, Model, Mutation};
//!
//! struct User;
//! impl Model for User {
//!     const TABLE: &'static str = "users";
//! }
//!
//! let affected = chainql::update::<User>()?
//!     .set()
//!     .set("status", "inactive")?
//!     .set_raw("updated_at", "now()")?
//!     .where_these([Condition::lt("last_login", cutoff)?])
//!     .execute(&client)
//!     .await?;
//! ```

pub mod client;
pub mod condition;
pub mod condition_group;
pub mod config;
pub mod error;
pub mod ident;
pub mod model;
pub mod sql;
pub mod statement;

#[cfg(feature = "pool")]
pub mod pool;

pub use client::GenericClient;
pub use condition::{Condition, Op};
pub use condition_group::{ConditionGroup, Separator};
pub use config::ExecConfig;
pub use error::{SqlError, SqlResult};
pub use ident::{Ident, IntoIdent};
pub use model::{Model, TableRef};
pub use sql::Sql;
pub use statement::{Mutation, Set, Statement, Update, Where, WhereBase};

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

/// Start an UPDATE on `M`'s table.
pub fn update<M: Model>() -> SqlResult<Update<M>> {
    Update::new()
}
