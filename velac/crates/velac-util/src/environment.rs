//! The two-tier lexically-scoped environment shared by the type checker and
//! the evaluator: each instantiates this once, over `TypeDescriptor`/
//! `FunctionSignature` and `Value`/`FunctionRecord` respectively, rather than
//! each hand-rolling its own scope chain.
//!
//! A child environment starts with `new_*` empty and `outer_*` holding a
//! snapshot of the parent's combined bindings (`outer_* ∪ new_*`). Lookup
//! checks `new_*` first, then `outer_*`. [`Environment::merge_from`] folds a
//! child's mutations back into the parent: a name the parent already owns in
//! `new_*` gets updated there, otherwise it updates the parent's `outer_*`.
//! New declarations made only in the child never propagate up. The rule is
//! applied identically to variables and functions.

use crate::Symbol;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Environment<V, F> {
    new_vars: HashMap<Symbol, V>,
    outer_vars: HashMap<Symbol, V>,
    new_funs: HashMap<Symbol, F>,
    outer_funs: HashMap<Symbol, F>,
}

impl<V: Clone, F: Clone> Environment<V, F> {
    pub fn fresh() -> Self {
        Self {
            new_vars: HashMap::new(),
            outer_vars: HashMap::new(),
            new_funs: HashMap::new(),
            outer_funs: HashMap::new(),
        }
    }

    /// A child scope sees everything the parent currently binds, but any
    /// declaration it makes itself stays local until [`merge_from`] runs.
    pub fn child(parent: &Self) -> Self {
        let mut outer_vars = parent.outer_vars.clone();
        outer_vars.extend(parent.new_vars.clone());
        let mut outer_funs = parent.outer_funs.clone();
        outer_funs.extend(parent.new_funs.clone());
        Self {
            new_vars: HashMap::new(),
            outer_vars,
            new_funs: HashMap::new(),
            outer_funs,
        }
    }

    pub fn add_var(&mut self, name: Symbol, value: V) {
        self.new_vars.insert(name, value);
    }

    pub fn get_var(&self, name: Symbol) -> Option<&V> {
        self.new_vars.get(&name).or_else(|| self.outer_vars.get(&name))
    }

    /// Updates a variable in place, wherever it currently lives (`new_*` if
    /// declared locally, else `outer_*`). Used by assignment, which never
    /// introduces a new binding.
    pub fn set_var(&mut self, name: Symbol, value: V) {
        if self.new_vars.contains_key(&name) {
            self.new_vars.insert(name, value);
        } else {
            self.outer_vars.insert(name, value);
        }
    }

    pub fn add_fun(&mut self, name: Symbol, record: F) {
        self.new_funs.insert(name, record);
    }

    pub fn get_fun(&self, name: Symbol) -> Option<&F> {
        self.new_funs.get(&name).or_else(|| self.outer_funs.get(&name))
    }

    /// Folds `child`'s view of inherited bindings back into `self` after the
    /// child scope finishes executing. Bindings the child introduced from
    /// scratch (its `new_*`) are discarded; only its `outer_*` — which started
    /// as a copy of ours and may have been mutated — flows back.
    pub fn merge_from(&mut self, child: &Self) {
        for (name, value) in &child.outer_vars {
            self.set_var(*name, value.clone());
        }
        for (name, record) in &child.outer_funs {
            if self.new_funs.contains_key(name) {
                self.new_funs.insert(*name, record.clone());
            } else {
                self.outer_funs.insert(*name, record.clone());
            }
        }
    }
}

impl<V: Clone, F: Clone> Default for Environment<V, F> {
    fn default() -> Self {
        Self::fresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_sees_parent_bindings() {
        let mut parent = Environment::<i32, ()>::fresh();
        parent.add_var(Symbol::intern("x"), 1);
        let child = Environment::child(&parent);
        assert_eq!(child.get_var(Symbol::intern("x")), Some(&1));
    }

    #[test]
    fn merge_back_propagates_mutation_not_new_decls() {
        let mut parent = Environment::<i32, ()>::fresh();
        parent.add_var(Symbol::intern("x"), 1);

        let mut child = Environment::child(&parent);
        child.set_var(Symbol::intern("x"), 2);
        child.add_var(Symbol::intern("y"), 99);

        parent.merge_from(&child);
        assert_eq!(parent.get_var(Symbol::intern("x")), Some(&2));
        assert_eq!(parent.get_var(Symbol::intern("y")), None);
    }

    #[test]
    fn functions_merge_back_symmetrically_with_variables() {
        let parent = Environment::<(), i32>::fresh();
        let mut child = Environment::child(&parent);
        child.add_fun(Symbol::intern("f"), 7);

        let mut parent = parent;
        parent.merge_from(&child);
        // `f` was a brand-new declaration in the child, so it does not
        // survive merge-back, matching the rule for variables.
        assert_eq!(parent.get_fun(Symbol::intern("f")), None);
    }
}
