use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

/// Chained binding scope. Clones share the same scope, and an enclosed
/// environment holds a strong link to its outer one, so a closure keeps
/// its whole defining chain alive for as long as the closure itself lives.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
}

struct Scope {
    store: HashMap<Rc<str>, Rc<Object>>,
    outer: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scope: Rc::new(RefCell::new(Scope {
                store: HashMap::new(),
                outer: None,
            })),
        }
    }

    pub fn new_enclosed(outer: &Environment) -> Environment {
        Environment {
            scope: Rc::new(RefCell::new(Scope {
                store: HashMap::new(),
                outer: Some(outer.clone()),
            })),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<Object>> {
        let scope = self.scope.borrow();
        scope
            .store
            .get(name)
            .cloned()
            .or_else(|| scope.outer.as_ref().and_then(|outer| outer.get(name)))
    }

    /// Binds in the current scope only; an outer binding of the same name
    /// is shadowed, never overwritten.
    pub fn set(&mut self, name: Rc<str>, value: Rc<Object>) {
        self.scope.borrow_mut().store.insert(name, value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("ptr", &Rc::as_ptr(&self.scope))
            .finish()
    }
}
