//! Parameter-safe SQL fragment buffer.
//!
//! Every stage of a statement renders into a shared [`Sql`] so placeholder
//! numbering stays consistent across stages: the SET list binds `$1..$n` and
//! the WHERE clause continues at `$n+1`.

use crate::error::SqlResult;
use crate::ident::{Ident, IntoIdent};
use std::fmt::Write;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A bound parameter value, shareable between repeated renders.
pub type BindValue = Arc<dyn ToSql + Sync + Send>;

#[derive(Debug, Clone)]
enum Part {
    Text(String),
    Param,
}

/// SQL text interleaved with parameter slots.
///
/// Slots render as `$1, $2, ...` in order of appearance.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Sql {
    parts: Vec<Part>,
    params: Vec<BindValue>,
}

impl Sql {
    pub fn new(initial: impl Into<String>) -> Self {
        let mut sql = Self::empty();
        sql.push(&initial.into());
        sql
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Append raw text.
    pub fn push(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        match self.parts.last_mut() {
            Some(Part::Text(last)) => last.push_str(text),
            _ => self.parts.push(Part::Text(text.to_string())),
        }
        self
    }

    /// Append a placeholder bound to `value`.
    pub fn push_bind<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.push_bind_value(Arc::new(value))
    }

    pub(crate) fn push_bind_value(&mut self, value: BindValue) -> &mut Self {
        self.parts.push(Part::Param);
        self.params.push(value);
        self
    }

    /// Validate and append an identifier.
    pub fn push_ident<I: IntoIdent>(&mut self, ident: I) -> SqlResult<&mut Self> {
        let ident = ident.into_ident()?;
        Ok(self.push_ident_ref(&ident))
    }

    /// Append an already validated identifier.
    pub fn push_ident_ref(&mut self, ident: &Ident) -> &mut Self {
        match self.parts.last_mut() {
            Some(Part::Text(last)) => ident.write_sql(last),
            _ => {
                let mut text = String::new();
                ident.write_sql(&mut text);
                self.parts.push(Part::Text(text));
            }
        }
        self
    }

    /// Append another fragment, renumbering its placeholders after ours.
    pub fn push_sql(&mut self, other: Sql) -> &mut Self {
        for part in other.parts {
            match part {
                Part::Text(text) => {
                    self.push(&text);
                }
                Part::Param => self.parts.push(Part::Param),
            }
        }
        self.params.extend(other.params);
        self
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render the text with numbered placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        let mut idx = 0usize;
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Param => {
                    idx += 1;
                    let _ = write!(out, "${idx}");
                }
            }
        }
        out
    }

    /// Parameter references in placeholder order, as `tokio-postgres` expects.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_follow_bind_order() {
        let mut q = Sql::new("UPDATE users SET name = ");
        q.push_bind("bob").push(", age = ").push_bind(30_i32);
        assert_eq!(q.to_sql(), "UPDATE users SET name = $1, age = $2");
        assert_eq!(q.param_count(), 2);
        assert_eq!(q.params_ref().len(), 2);
    }

    #[test]
    fn appended_fragments_are_renumbered() {
        let mut set = Sql::new("SET a = ");
        set.push_bind(1_i32);
        let mut filter = Sql::new(" WHERE b = ");
        filter.push_bind(2_i32);

        set.push_sql(filter);
        assert_eq!(set.to_sql(), "SET a = $1 WHERE b = $2");
        assert_eq!(set.param_count(), 2);
    }

    #[test]
    fn identifiers_are_validated() {
        let mut q = Sql::new("UPDATE ");
        q.push_ident("public.users").unwrap();
        assert_eq!(q.to_sql(), "UPDATE public.users");
        assert!(q.push_ident("users; DROP TABLE x").is_err());
    }

    #[test]
    fn empty_pushes_are_ignored() {
        let mut q = Sql::empty();
        q.push("");
        assert!(q.is_empty());
        assert_eq!(q.to_sql(), "");
    }
}
