//! Entity types and the table they map to.

use std::any::TypeId;
use std::fmt;

/// A Rust type backed by a database table.
///
/// ```
/// use chainql::Model;
///
/// struct User;
///
/// impl Model for User {
///     const TABLE: &'static str = "users";
/// }
/// ```
pub trait Model: 'static {
    /// Table name, optionally schema-qualified (`public.users`).
    const TABLE: &'static str;
}

/// Runtime handle to the entity type a builder targets.
///
/// Builders are already typed by their model; this exists for callers that
/// hold builders behind trait objects and need to check the target.
#[derive(Clone, Copy)]
pub struct TableRef {
    name: &'static str,
    type_name: &'static str,
    type_id: TypeId,
}

impl TableRef {
    pub fn of<M: Model>() -> Self {
        Self {
            name: M::TABLE,
            type_name: std::any::type_name::<M>(),
            type_id: TypeId::of::<M>(),
        }
    }

    /// Table name as declared by the model.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fully qualified Rust type name of the model.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Whether this table belongs to model `N`.
    pub fn is<N: Model>(&self) -> bool {
        self.type_id == TypeId::of::<N>()
    }
}

impl PartialEq for TableRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TableRef {}

impl fmt::Debug for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRef")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Users;
    impl Model for Users {
        const TABLE: &'static str = "users";
    }

    struct Accounts;
    impl Model for Accounts {
        const TABLE: &'static str = "users";
    }

    #[test]
    fn identity_is_the_type_not_the_name() {
        let users = TableRef::of::<Users>();
        assert_eq!(users.name(), "users");
        assert!(users.is::<Users>());
        assert!(!users.is::<Accounts>());
        assert_ne!(users, TableRef::of::<Accounts>());
        assert!(users.type_name().ends_with("Users"));
    }
}
