//! Stage-chained UPDATE statements.
//!
//! A statement is assembled left to right, each stage owning the one before
//! it:
//!
//! ```text
//! Update<M> --set()--> Set<M> --where_*()--> Where<Set<M>>
//! ```
//!
//! Any stage renders the whole statement up to itself, and all stages share
//! one placeholder sequence, so SET values bind `$1..$n` and WHERE values
//! continue from `$n+1`.

mod exec;
pub mod set;
pub mod traits;
pub mod update;
pub mod where_clause;

pub use set::Set;
pub use traits::{Mutation, Statement, WhereBase};
pub use update::Update;
pub use where_clause::Where;
