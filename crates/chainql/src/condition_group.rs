//! Ordered collections of conditions joined by a separator.

use crate::condition::Condition;
use crate::model::{Model, TableRef};
use crate::sql::Sql;
use std::fmt;
use std::marker::PhantomData;

/// How the entries of a [`ConditionGroup`] are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    /// `a AND b`
    #[default]
    And,
    /// `a OR b`
    Or,
    /// `a,b`, the column list of a SET clause
    Comma,
}

impl Separator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Separator::And => " AND ",
            Separator::Or => " OR ",
            Separator::Comma => ",",
        }
    }
}

#[derive(Clone)]
enum Entry {
    Condition(Condition),
    Group {
        separator: Separator,
        entries: Vec<Entry>,
    },
}

/// Conditions for model `M`, rendered in insertion order.
///
/// Duplicates are kept. Nested groups render in parentheses; a nested group
/// with no entries renders nothing.
///
/// ```
/// use chainql::{Condition, ConditionGroup, Model};
///
/// struct User;
/// impl Model for User {
///     const TABLE: &'static str = "users";
/// }
///
/// let mut active = ConditionGroup::<User>::any();
/// active.put(Condition::raw("role = 'admin'"));
/// active.put(Condition::raw("verified"));
///
/// let mut group = ConditionGroup::<User>::new();
/// group.put(Condition::raw("deleted_at IS NULL")).put_group(active);
/// assert_eq!(group.to_sql(), "deleted_at IS NULL AND (role = 'admin' OR verified)");
/// ```
pub struct ConditionGroup<M: Model> {
    separator: Separator,
    entries: Vec<Entry>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> ConditionGroup<M> {
    /// Empty group joined by `AND`.
    pub fn new() -> Self {
        Self::with_separator(Separator::And)
    }

    /// Empty group joined by `OR`.
    pub fn any() -> Self {
        Self::with_separator(Separator::Or)
    }

    pub fn with_separator(separator: Separator) -> Self {
        Self {
            separator,
            entries: Vec::new(),
            _model: PhantomData,
        }
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn set_separator(&mut self, separator: Separator) -> &mut Self {
        self.separator = separator;
        self
    }

    /// Append one condition.
    pub fn put(&mut self, condition: Condition) -> &mut Self {
        self.entries.push(Entry::Condition(condition));
        self
    }

    /// Append conditions, keeping their order.
    pub fn put_conditions<I>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator<Item = Condition>,
    {
        self.entries
            .extend(conditions.into_iter().map(Entry::Condition));
        self
    }

    /// Append a nested group, rendered in parentheses with its own separator.
    pub fn put_group(&mut self, group: ConditionGroup<M>) -> &mut Self {
        self.entries.push(Entry::Group {
            separator: group.separator,
            entries: group.entries,
        });
        self
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether rendering would produce no text (empty, or only empty nested groups).
    pub(crate) fn renders_empty(&self) -> bool {
        entries_render_empty(&self.entries)
    }

    /// Top-level conditions in insertion order (nested groups are skipped).
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Condition(c) => Some(c),
            Entry::Group { .. } => None,
        })
    }

    pub fn table(&self) -> TableRef {
        TableRef::of::<M>()
    }

    /// Render all entries joined by the separator.
    pub fn append_to(&self, sql: &mut Sql) {
        append_entries(sql, self.separator, &self.entries);
    }

    pub fn to_sql(&self) -> String {
        let mut sql = Sql::empty();
        self.append_to(&mut sql);
        sql.to_sql()
    }
}

fn entries_render_empty(entries: &[Entry]) -> bool {
    entries.iter().all(|entry| match entry {
        Entry::Condition(_) => false,
        Entry::Group { entries, .. } => entries_render_empty(entries),
    })
}

fn append_entries(sql: &mut Sql, separator: Separator, entries: &[Entry]) {
    let mut first = true;
    for entry in entries {
        if let Entry::Group { entries, .. } = entry
            && entries_render_empty(entries)
        {
            continue;
        }
        if !first {
            sql.push(separator.as_sql());
        }
        first = false;

        match entry {
            Entry::Condition(c) => c.append_to(sql),
            Entry::Group { separator, entries } => {
                sql.push("(");
                append_entries(sql, *separator, entries);
                sql.push(")");
            }
        }
    }
}

impl<M: Model> Default for ConditionGroup<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for ConditionGroup<M> {
    fn clone(&self) -> Self {
        Self {
            separator: self.separator,
            entries: self.entries.clone(),
            _model: PhantomData,
        }
    }
}

impl<M: Model> fmt::Debug for ConditionGroup<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionGroup")
            .field("table", &M::TABLE)
            .field("separator", &self.separator)
            .field("sql", &self.to_sql())
            .finish()
    }
}

impl<M: Model> FromIterator<Condition> for ConditionGroup<M> {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut group = Self::new();
        group.put_conditions(iter);
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Users;
    impl Model for Users {
        const TABLE: &'static str = "users";
    }

    #[test]
    fn separators_join_in_insertion_order() {
        let mut group = ConditionGroup::<Users>::with_separator(Separator::Comma);
        group.put_conditions([
            Condition::raw("a=1"),
            Condition::raw("b=2"),
            Condition::raw("a=1"),
        ]);
        assert_eq!(group.to_sql(), "a=1,b=2,a=1");
        assert_eq!(group.len(), 3);

        group.set_separator(Separator::Or);
        assert_eq!(group.to_sql(), "a=1 OR b=2 OR a=1");
    }

    #[test]
    fn placeholders_continue_across_entries() {
        let mut group = ConditionGroup::<Users>::new();
        group
            .put(Condition::eq("status", "active").unwrap())
            .put(Condition::between("age", 18_i32, 65).unwrap());
        assert_eq!(group.to_sql(), "status = $1 AND age BETWEEN $2 AND $3");
    }

    #[test]
    fn empty_nested_groups_are_skipped() {
        let mut group = ConditionGroup::<Users>::new();
        group
            .put_group(ConditionGroup::any())
            .put(Condition::raw("x"))
            .put_group(ConditionGroup::any());
        assert_eq!(group.to_sql(), "x");
        assert_eq!(group.conditions().count(), 1);

        let mut hollow = ConditionGroup::<Users>::new();
        hollow.put_group(ConditionGroup::any());
        assert!(!hollow.is_empty());
        assert!(hollow.renders_empty());
        assert_eq!(hollow.to_sql(), "");
    }

    #[test]
    fn empty_group_renders_nothing() {
        let group = ConditionGroup::<Users>::default();
        assert!(group.is_empty());
        assert_eq!(group.to_sql(), "");
        assert!(group.table().is::<Users>());
    }

    #[test]
    fn collects_from_iterator() {
        let group: ConditionGroup<Users> = ["a", "b"].into_iter().map(Condition::raw).collect();
        assert_eq!(group.separator(), Separator::And);
        assert_eq!(group.to_sql(), "a AND b");
    }
}
