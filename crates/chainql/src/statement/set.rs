use super::traits::{Mutation, Statement, WhereBase};
use super::update::Update;
use super::where_clause::Where;
use crate::condition::Condition;
use crate::condition_group::{ConditionGroup, Separator};
use crate::error::{SqlError, SqlResult};
use crate::ident::IntoIdent;
use crate::model::{Model, TableRef};
use crate::sql::Sql;
use std::fmt;
use tokio_postgres::types::ToSql;

/// The `SET` clause of an UPDATE.
///
/// Renders `<UPDATE root>SET <a>,<b>,... ` with the assignments joined by a
/// bare comma in the order they were added. Rendering never consumes the
/// builder and never fails: an empty list renders `SET  ` and is only
/// rejected when the statement is executed.
///
/// ```
/// use chainql::{Condition, Model, Statement};
///
/// struct User;
/// impl Model for User {
///     const TABLE: &'static str = "Users";
/// }
///
/// let set = chainql::update::<User>()
///     .unwrap()
///     .set()
///     .conditions([Condition::raw("name='Bob'"), Condition::raw("age=30")]);
/// assert_eq!(set.to_sql(), "UPDATE Users SET name='Bob',age=30 ");
/// ```
pub struct Set<M: Model> {
    update: Update<M>,
    group: ConditionGroup<M>,
}

impl<M: Model> Set<M> {
    pub(crate) fn new(update: Update<M>) -> Self {
        Self {
            update,
            group: ConditionGroup::with_separator(Separator::Comma),
        }
    }

    /// Replace the assignment list with `group`, forcing its separator to comma.
    ///
    /// `None` leaves the current list and its conditions untouched.
    pub fn condition_group(mut self, group: Option<ConditionGroup<M>>) -> Self {
        if let Some(mut group) = group {
            #[cfg(feature = "tracing")]
            {
                if group.separator() != Separator::Comma {
                    tracing::trace!(
                        target: "chainql.builder",
                        table = M::TABLE,
                        from = ?group.separator(),
                        "forcing SET separator to comma"
                    );
                }
            }
            group.set_separator(Separator::Comma);
            self.group = group;
        }
        self
    }

    /// Append assignments in order. Duplicates are kept.
    pub fn conditions<I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        self.group.put_conditions(conditions);
        self
    }

    /// Append a single assignment.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.group.put(condition);
        self
    }

    // ==================== Assignment helpers ====================

    /// `column = $n`
    pub fn set<I, T>(self, column: I, value: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Ok(self.condition(Condition::eq(column, value)?))
    }

    /// `column = $n` when `value` is `Some`, otherwise nothing.
    pub fn set_opt<I, T>(self, column: I, value: Option<T>) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        match value {
            Some(v) => self.set(column, v),
            None => Ok(self),
        }
    }

    /// `column = <expr>` with `expr` spliced verbatim.
    ///
    /// # Safety
    ///
    /// This directly concatenates SQL. The caller must ensure safety.
    pub fn set_raw<I: IntoIdent>(self, column: I, expr: &str) -> SqlResult<Self> {
        Ok(self.condition(Condition::assign_raw(column, expr)?))
    }

    /// `column = $n` bound as a JSON value.
    pub fn set_json<I, T>(self, column: I, value: &T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: serde::Serialize + ?Sized,
    {
        let json = serde_json::to_value(value)?;
        self.set(column, json)
    }

    // ==================== WHERE ====================

    /// Continue with an empty WHERE clause.
    pub fn where_(self) -> Where<Self> {
        Where::new(self)
    }

    /// Continue with a WHERE clause holding exactly `conditions`, in order.
    pub fn where_these<I>(self, conditions: I) -> Where<Self>
    where
        I: IntoIterator<Item = Condition>,
    {
        self.where_().and_these(conditions)
    }

    /// Continue with a WHERE clause built from the caller's group.
    pub fn where_group(self, group: ConditionGroup<M>) -> Where<Self> {
        self.where_().where_group(group)
    }

    // ==================== Accessors ====================

    /// The current assignment list.
    pub fn group(&self) -> &ConditionGroup<M> {
        &self.group
    }

    /// The UPDATE root this clause follows.
    pub fn base(&self) -> &Update<M> {
        &self.update
    }

    pub fn table(&self) -> TableRef {
        self.group.table()
    }
}

impl<M: Model> Statement for Set<M> {
    fn append_to(&self, sql: &mut Sql) {
        self.update.append_to(sql);
        sql.push("SET ");
        self.group.append_to(sql);
        sql.push(" ");
    }
}

impl<M: Model> WhereBase for Set<M> {
    type Model = M;

    fn table(&self) -> TableRef {
        self.group.table()
    }

    fn base_statement(&self) -> &dyn Statement {
        &self.update
    }
}

impl<M: Model> Mutation for Set<M> {
    fn validate(&self) -> SqlResult<()> {
        if self.group.renders_empty() {
            return Err(SqlError::validation(format!(
                "UPDATE {}: SET clause cannot be empty",
                M::TABLE
            )));
        }
        Ok(())
    }
}

impl<M: Model> Clone for Set<M> {
    fn clone(&self) -> Self {
        Self {
            update: self.update.clone(),
            group: self.group.clone(),
        }
    }
}

impl<M: Model> fmt::Debug for Set<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Set")
            .field("update", &self.update)
            .field("group", &self.group)
            .finish()
    }
}
