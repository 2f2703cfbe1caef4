use crate::object::{EvaluationError, Object};
use gc::{Finalize, Gc, GcCell, Trace};
use std::collections::HashMap;
use std::rc::Rc;

// Values are stored by value so the collector can trace the closures they
// hold. Function scopes and the closures declared in them point at each
// other, and only tracing can reclaim such cycles.
#[derive(Trace, Finalize)]
struct Scope {
    store: HashMap<String, Object>,
    outer: Option<Environment>,
}

/// A shared handle to one scope in the chain. Clones refer to the same
/// scope, so closures see later writes to the variables they captured.
#[derive(Clone, Trace, Finalize)]
pub struct Environment {
    scope: Gc<GcCell<Scope>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::with_outer(None)
    }

    pub fn new_enclosed(outer: Environment) -> Environment {
        Self::with_outer(Some(outer))
    }

    fn with_outer(outer: Option<Environment>) -> Environment {
        Environment {
            scope: Gc::new(GcCell::new(Scope {
                store: HashMap::new(),
                outer,
            })),
        }
    }

    /// Binds `name` in this scope only. Shadowing an outer binding is fine,
    /// defining the same name twice in one scope is not.
    pub fn define(&self, name: Rc<str>, value: Rc<Object>) -> Result<(), EvaluationError> {
        let mut scope = self.scope.borrow_mut();
        if scope.store.contains_key(name.as_ref()) {
            return Err(EvaluationError::DuplicateDefinition(name));
        }
        scope.store.insert(name.to_string(), value.as_ref().clone());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Rc<Object>, EvaluationError> {
        let scope = self.scope.borrow();
        match (scope.store.get(name), &scope.outer) {
            (Some(value), _) => Ok(Rc::new(value.clone())),
            (None, Some(outer)) => outer.get(name),
            (None, None) => Err(EvaluationError::UndefinedVariable(name.into())),
        }
    }

    /// Overwrites the innermost existing binding of `name` and returns the
    /// assigned value.
    pub fn assign(&self, name: &str, value: Rc<Object>) -> Result<Rc<Object>, EvaluationError> {
        let mut scope = self.scope.borrow_mut();
        if let Some(slot) = scope.store.get_mut(name) {
            *slot = value.as_ref().clone();
            return Ok(value);
        }
        match &scope.outer {
            Some(outer) => outer.assign(name, value),
            None => Err(EvaluationError::UndefinedVariable(name.into())),
        }
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Gc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scope = self.scope.borrow();
        let mut names = scope.store.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("outer", &scope.outer)
            .finish()
    }
}
