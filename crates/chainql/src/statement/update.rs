use super::set::Set;
use super::traits::Statement;
use crate::error::SqlResult;
use crate::ident::Ident;
use crate::model::{Model, TableRef};
use crate::sql::Sql;
use std::fmt;
use std::marker::PhantomData;

/// Root of an UPDATE statement: `UPDATE <table> `.
pub struct Update<M: Model> {
    table: Ident,
    only: bool,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Update<M> {
    /// Start an UPDATE on `M::TABLE`, which must be a valid identifier.
    pub fn new() -> SqlResult<Self> {
        Ok(Self {
            table: Ident::parse(M::TABLE)?,
            only: false,
            _model: PhantomData,
        })
    }

    /// `UPDATE ONLY`: leave inheriting child tables untouched.
    pub fn only(mut self) -> Self {
        self.only = true;
        self
    }

    /// Begin the SET clause.
    pub fn set(self) -> Set<M> {
        Set::new(self)
    }

    pub fn table(&self) -> TableRef {
        TableRef::of::<M>()
    }
}

impl<M: Model> Statement for Update<M> {
    fn append_to(&self, sql: &mut Sql) {
        sql.push(if self.only { "UPDATE ONLY " } else { "UPDATE " });
        sql.push_ident_ref(&self.table).push(" ");
    }
}

impl<M: Model> Clone for Update<M> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            only: self.only,
            _model: PhantomData,
        }
    }
}

impl<M: Model> fmt::Debug for Update<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Update")
            .field("table", &self.table.to_sql())
            .field("only", &self.only)
            .finish()
    }
}
