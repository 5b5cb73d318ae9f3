use super::traits::{Mutation, Statement, WhereBase};
use crate::condition::Condition;
use crate::condition_group::ConditionGroup;
use crate::error::SqlResult;
use crate::ident::{Ident, IntoIdent};
use crate::model::TableRef;
use crate::sql::Sql;
use std::fmt;

#[derive(Debug, Clone)]
enum Returning {
    None,
    All,
    Columns(Vec<Ident>),
}

/// The `WHERE` clause chained after a [`WhereBase`] stage.
///
/// Conditions are joined with `AND` unless a group with another separator
/// is installed via [`Where::where_group`]. With no conditions the clause
/// renders nothing and the statement is the base's text unchanged.
pub struct Where<B: WhereBase> {
    base: B,
    group: ConditionGroup<B::Model>,
    returning: Returning,
}

impl<B: WhereBase> Where<B> {
    pub fn new(base: B) -> Self {
        Self {
            base,
            group: ConditionGroup::new(),
            returning: Returning::None,
        }
    }

    /// Append a condition.
    pub fn and(mut self, condition: Condition) -> Self {
        self.group.put(condition);
        self
    }

    /// Append conditions in order.
    pub fn and_these<I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        self.group.put_conditions(conditions);
        self
    }

    /// Append a nested group, e.g. an `OR` alternative.
    pub fn and_group(mut self, group: ConditionGroup<B::Model>) -> Self {
        self.group.put_group(group);
        self
    }

    /// Replace the conditions with `group`, keeping its separator.
    pub fn where_group(mut self, group: ConditionGroup<B::Model>) -> Self {
        self.group = group;
        self
    }

    /// `RETURNING col, ...` with validated column names.
    pub fn returning<I, C>(mut self, columns: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = C>,
        C: IntoIdent,
    {
        let columns = columns
            .into_iter()
            .map(IntoIdent::into_ident)
            .collect::<SqlResult<Vec<_>>>()?;
        self.returning = if columns.is_empty() {
            Returning::None
        } else {
            Returning::Columns(columns)
        };
        Ok(self)
    }

    /// `RETURNING *`
    pub fn returning_all(mut self) -> Self {
        self.returning = Returning::All;
        self
    }

    pub fn group(&self) -> &ConditionGroup<B::Model> {
        &self.group
    }

    /// The stage this clause was chained onto.
    pub fn base(&self) -> &B {
        &self.base
    }

    /// Give the base stage back, dropping the WHERE clause.
    pub fn into_base(self) -> B {
        self.base
    }

    pub fn table(&self) -> TableRef {
        self.base.table()
    }
}

impl<B: WhereBase> Statement for Where<B> {
    fn append_to(&self, sql: &mut Sql) {
        self.base.append_to(sql);

        let has_where = !self.group.renders_empty();
        if has_where {
            sql.push("WHERE ");
            self.group.append_to(sql);
        }

        let lead = if has_where { " RETURNING " } else { "RETURNING " };
        match &self.returning {
            Returning::None => {}
            Returning::All => {
                sql.push(lead).push("*");
            }
            Returning::Columns(columns) => {
                sql.push(lead);
                for (i, col) in columns.iter().enumerate() {
                    if i > 0 {
                        sql.push(", ");
                    }
                    sql.push_ident_ref(col);
                }
            }
        }
    }
}

impl<B> Mutation for Where<B>
where
    B: WhereBase + Mutation,
{
    fn validate(&self) -> SqlResult<()> {
        self.base.validate()
    }

    fn has_where(&self) -> bool {
        !self.group.renders_empty()
    }
}

impl<B: WhereBase + Clone> Clone for Where<B> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            group: self.group.clone(),
            returning: self.returning.clone(),
        }
    }
}

impl<B: WhereBase + fmt::Debug> fmt::Debug for Where<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Where")
            .field("base", &self.base)
            .field("group", &self.group)
            .field("returning", &self.returning)
            .finish()
    }
}
