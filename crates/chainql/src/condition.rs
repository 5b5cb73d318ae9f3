//! Column conditions used by SET and WHERE clauses.
//!
//! A [`Condition`] is opaque to the builders that hold it: they only ask it to
//! render into a [`Sql`] buffer. The same `col = $n` condition serves as a
//! column assignment inside `SET` and as a comparison inside `WHERE`.

use crate::error::SqlResult;
use crate::ident::{Ident, IntoIdent};
use crate::sql::{BindValue, Sql};
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Comparison operator with its operand(s).
///
/// ```
/// use chainql::{Condition, Op};
///
/// let c = Condition::new("age", Op::between(18, 65)).unwrap();
/// assert_eq!(c.to_sql(), "age BETWEEN $1 AND $2");
/// ```
#[derive(Debug, Clone)]
pub enum Op<T> {
    Eq(T),
    Ne(T),
    Gt(T),
    Gte(T),
    Lt(T),
    Lte(T),
    Like(T),
    /// Case-insensitive LIKE
    Ilike(T),
    IsNull,
    IsNotNull,
    In(Vec<T>),
    NotIn(Vec<T>),
    Between(T, T),
}

impl<T> Op<T> {
    pub fn eq(val: T) -> Self {
        Op::Eq(val)
    }

    pub fn ne(val: T) -> Self {
        Op::Ne(val)
    }

    pub fn gt(val: T) -> Self {
        Op::Gt(val)
    }

    pub fn gte(val: T) -> Self {
        Op::Gte(val)
    }

    pub fn lt(val: T) -> Self {
        Op::Lt(val)
    }

    pub fn lte(val: T) -> Self {
        Op::Lte(val)
    }

    pub fn like(val: T) -> Self {
        Op::Like(val)
    }

    pub fn ilike(val: T) -> Self {
        Op::Ilike(val)
    }

    pub fn is_null() -> Self {
        Op::IsNull
    }

    pub fn is_not_null() -> Self {
        Op::IsNotNull
    }

    pub fn in_list(vals: Vec<T>) -> Self {
        Op::In(vals)
    }

    pub fn not_in(vals: Vec<T>) -> Self {
        Op::NotIn(vals)
    }

    pub fn between(from: T, to: T) -> Self {
        Op::Between(from, to)
    }
}

#[derive(Debug, Clone)]
enum Operand {
    None,
    Single(BindValue),
    Pair(BindValue, BindValue),
    List(Vec<BindValue>),
}

#[derive(Debug, Clone)]
enum Inner {
    /// Literal SQL, inserted verbatim.
    Raw(String),
    Compare {
        column: Ident,
        operator: &'static str,
        operand: Operand,
    },
    /// `column = <expression>` with no bound value.
    AssignRaw { column: Ident, expr: String },
}

/// A single column assignment or comparison.
#[derive(Debug, Clone)]
pub struct Condition(Inner);

fn bind<T: ToSql + Send + Sync + 'static>(value: T) -> BindValue {
    Arc::new(value)
}

impl Condition {
    /// Build a condition from a validated column and an operator.
    pub fn new<I, T>(column: I, op: Op<T>) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        let column = column.into_ident()?;
        let (operator, operand) = match op {
            Op::Eq(v) => ("=", Operand::Single(bind(v))),
            Op::Ne(v) => ("!=", Operand::Single(bind(v))),
            Op::Gt(v) => (">", Operand::Single(bind(v))),
            Op::Gte(v) => (">=", Operand::Single(bind(v))),
            Op::Lt(v) => ("<", Operand::Single(bind(v))),
            Op::Lte(v) => ("<=", Operand::Single(bind(v))),
            Op::Like(v) => ("LIKE", Operand::Single(bind(v))),
            Op::Ilike(v) => ("ILIKE", Operand::Single(bind(v))),
            Op::IsNull => ("IS NULL", Operand::None),
            Op::IsNotNull => ("IS NOT NULL", Operand::None),
            Op::In(vals) => ("IN", Operand::List(vals.into_iter().map(bind).collect())),
            Op::NotIn(vals) => ("NOT IN", Operand::List(vals.into_iter().map(bind).collect())),
            Op::Between(from, to) => ("BETWEEN", Operand::Pair(bind(from), bind(to))),
        };
        Ok(Self(Inner::Compare {
            column,
            operator,
            operand,
        }))
    }

    /// Literal SQL condition.
    ///
    /// # Safety
    ///
    /// The text is concatenated as-is. The caller must ensure it is safe.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self(Inner::Raw(sql.into()))
    }

    /// `column = expr`, e.g. `assign_raw("hits", "hits + 1")`.
    ///
    /// The column is validated; `expr` is concatenated as-is.
    pub fn assign_raw<I: IntoIdent>(column: I, expr: impl Into<String>) -> SqlResult<Self> {
        Ok(Self(Inner::AssignRaw {
            column: column.into_ident()?,
            expr: expr.into(),
        }))
    }

    // ==================== Convenience constructors ====================

    /// `column = value`; in a SET clause this is the column assignment.
    pub fn eq<I, T>(column: I, value: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Eq(value))
    }

    pub fn ne<I, T>(column: I, value: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Ne(value))
    }

    pub fn gt<I, T>(column: I, value: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Gt(value))
    }

    pub fn gte<I, T>(column: I, value: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Gte(value))
    }

    pub fn lt<I, T>(column: I, value: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Lt(value))
    }

    pub fn lte<I, T>(column: I, value: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Lte(value))
    }

    pub fn like<I, T>(column: I, pattern: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Like(pattern))
    }

    pub fn ilike<I, T>(column: I, pattern: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Ilike(pattern))
    }

    pub fn is_null<I: IntoIdent>(column: I) -> SqlResult<Self> {
        Self::new(column, Op::<bool>::IsNull)
    }

    pub fn is_not_null<I: IntoIdent>(column: I) -> SqlResult<Self> {
        Self::new(column, Op::<bool>::IsNotNull)
    }

    /// `column IN (...)`; an empty list renders `1=0`.
    pub fn in_list<I, T>(column: I, values: Vec<T>) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::In(values))
    }

    /// `column NOT IN (...)`; an empty list renders `1=1`.
    pub fn not_in<I, T>(column: I, values: Vec<T>) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::NotIn(values))
    }

    pub fn between<I, T>(column: I, from: T, to: T) -> SqlResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Between(from, to))
    }

    /// The column this condition targets, if it is structured.
    pub fn column(&self) -> Option<&Ident> {
        match &self.0 {
            Inner::Raw(_) => None,
            Inner::Compare { column, .. } | Inner::AssignRaw { column, .. } => Some(column),
        }
    }

    /// Render into `sql`, binding any values as placeholders.
    pub fn append_to(&self, sql: &mut Sql) {
        match &self.0 {
            Inner::Raw(text) => {
                sql.push(text);
            }
            Inner::AssignRaw { column, expr } => {
                sql.push_ident_ref(column).push(" = ").push(expr);
            }
            Inner::Compare {
                column,
                operator,
                operand,
            } => match operand {
                Operand::List(vals) if vals.is_empty() => {
                    sql.push(if *operator == "IN" { "1=0" } else { "1=1" });
                }
                Operand::None => {
                    sql.push_ident_ref(column).push(" ").push(operator);
                }
                Operand::Single(v) => {
                    sql.push_ident_ref(column).push(" ").push(operator).push(" ");
                    sql.push_bind_value(v.clone());
                }
                Operand::Pair(a, b) => {
                    sql.push_ident_ref(column).push(" ").push(operator).push(" ");
                    sql.push_bind_value(a.clone()).push(" AND ");
                    sql.push_bind_value(b.clone());
                }
                Operand::List(vals) => {
                    sql.push_ident_ref(column).push(" ").push(operator).push(" (");
                    for (i, v) in vals.iter().enumerate() {
                        if i > 0 {
                            sql.push(", ");
                        }
                        sql.push_bind_value(v.clone());
                    }
                    sql.push(")");
                }
            },
        }
    }

    /// Standalone rendering, numbering placeholders from `$1`.
    pub fn to_sql(&self) -> String {
        let mut sql = Sql::empty();
        self.append_to(&mut sql);
        sql.to_sql()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_render_operator_and_placeholder() {
        assert_eq!(Condition::eq("name", "bob").unwrap().to_sql(), "name = $1");
        assert_eq!(Condition::ne("role", "guest").unwrap().to_sql(), "role != $1");
        assert_eq!(Condition::gte("age", 18_i32).unwrap().to_sql(), "age >= $1");
        assert_eq!(
            Condition::ilike("email", "%@x.io").unwrap().to_sql(),
            "email ILIKE $1"
        );
    }

    #[test]
    fn null_checks_bind_nothing() {
        let c = Condition::is_null("deleted_at").unwrap();
        let mut sql = Sql::empty();
        c.append_to(&mut sql);
        assert_eq!(sql.to_sql(), "deleted_at IS NULL");
        assert_eq!(sql.param_count(), 0);
    }

    #[test]
    fn lists_expand_and_degrade_when_empty() {
        assert_eq!(
            Condition::in_list("id", vec![1_i64, 2, 3]).unwrap().to_sql(),
            "id IN ($1, $2, $3)"
        );
        assert_eq!(
            Condition::in_list("id", Vec::<i64>::new()).unwrap().to_sql(),
            "1=0"
        );
        assert_eq!(
            Condition::not_in("id", Vec::<i64>::new()).unwrap().to_sql(),
            "1=1"
        );
    }

    #[test]
    fn raw_and_assign_raw_are_verbatim() {
        assert_eq!(Condition::raw("name='Bob'").to_sql(), "name='Bob'");
        let bump = Condition::assign_raw("hits", "hits + 1").unwrap();
        assert_eq!(bump.to_sql(), "hits = hits + 1");
        assert_eq!(bump.column().map(Ident::to_sql).as_deref(), Some("hits"));
        assert!(Condition::raw("1=1").column().is_none());
    }

    #[test]
    fn invalid_columns_are_rejected() {
        assert!(Condition::eq("name; --", 1_i32).is_err());
        assert!(Condition::assign_raw("", "now()").is_err());
    }
}
