use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use crate::runtime::execution::{Closure, Executable};

/// A named method: the declared formal parameters (excluding the implicit
/// `self`) and the body to evaluate on call.
pub struct Method {
    pub name: String,
    pub formal_params: Vec<String>,
    pub body: Box<dyn Executable>,
}

/// Immutable class descriptor: a method table plus an optional parent for
/// single inheritance. Built once during class definition and shared by
/// every instance.
pub struct Class {
    name: String,
    methods: HashMap<String, Method>,
    parent: Option<Rc<Class>>,
}

impl Class {
    pub fn new(name: impl Into<String>, methods: Vec<Method>, parent: Option<Rc<Class>>) -> Self {
        let methods = methods
            .into_iter()
            .map(|method| (method.name.clone(), method))
            .collect();
        Self {
            name: name.into(),
            methods,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finds a method by name, walking the inheritance chain upwards from
    /// this class. The first match wins, so child overrides shadow parents.
    pub fn get_method(&self, name: &str) -> Option<&Method> {
        if let Some(method) = self.methods.get(name) {
            return Some(method);
        }
        self.parent
            .as_ref()
            .and_then(|parent| parent.get_method(name))
    }
}

/// A value of a user-defined class: a pointer to its class and a private
/// mutable field table.
pub struct ClassInstance {
    class: Rc<Class>,
    fields: RefCell<Closure>,
}

impl ClassInstance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(Closure::new()),
        }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn fields(&self) -> Ref<'_, Closure> {
        self.fields.borrow()
    }

    pub fn fields_mut(&self) -> RefMut<'_, Closure> {
        self.fields.borrow_mut()
    }

    /// True when the class or an ancestor defines `method` with exactly
    /// `arity` declared parameters.
    pub fn has_method(&self, method: &str, arity: usize) -> bool {
        self.class
            .get_method(method)
            .is_some_and(|found| found.formal_params.len() == arity)
    }
}
