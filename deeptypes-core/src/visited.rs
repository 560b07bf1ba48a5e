// deeptypes-core - Cycle detection
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The set of references entered by one traversal.
//!
//! Entries follow stack discipline: a reference is entered when it is
//! dereferenced and left once its subtree is done. A reference reached
//! twice along different, non-cyclic paths is therefore never mistaken for
//! a cycle; only re-entry while still inside it is.

use std::collections::HashSet;

use deeptypes_value::{Ref, identity};

/// Reference identities currently on the traversal path.
#[derive(Debug, Default)]
pub struct Visited {
    ids: HashSet<usize>,
}

impl Visited {
    pub fn new() -> Self {
        Visited::default()
    }

    /// Enter a reference. Returns false if it is already on the path, i.e.
    /// dereferencing it would close a cycle.
    pub fn enter(&mut self, target: &Ref) -> bool {
        self.ids.insert(identity(target))
    }

    /// Leave a reference previously entered.
    pub fn leave(&mut self, target: &Ref) {
        self.ids.remove(&identity(target));
    }

    /// Whether a reference is on the path.
    pub fn contains(&self, target: &Ref) -> bool {
        self.ids.contains(&identity(target))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deeptypes_value::{Value, new_ref};

    #[test]
    fn test_enter_leave() {
        let a = new_ref(Value::int(1));
        let b = new_ref(Value::int(1));
        let mut visited = Visited::new();

        assert!(visited.enter(&a));
        assert!(!visited.enter(&a));
        assert!(visited.contains(&a));
        assert!(!visited.contains(&b));
        assert_eq!(visited.len(), 1);

        visited.leave(&a);
        assert!(visited.is_empty());
        assert!(visited.enter(&a));
    }

    #[test]
    fn test_identity_follows_cell_not_handle() {
        let a = new_ref(Value::int(1));
        let alias = a.clone();
        let mut visited = Visited::new();
        assert!(visited.enter(&a));
        assert!(visited.contains(&alias));
    }
}
