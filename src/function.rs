use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::class::Instance;
use crate::environment::{EnvRef, Environment};
use crate::value::Value;

/// A user-defined function: its declaration plus the environment that was
/// active where it was declared.
///
/// Calls run in a fresh frame parented on `closure`, never on the caller's
/// environment.
pub struct Function {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,
    is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    pub fn declaration(&self) -> &FunctionDecl {
        &self.declaration
    }

    pub fn closure(&self) -> &EnvRef {
        &self.closure
    }

    /// Is this the `init` method of a class?
    pub fn is_initializer(&self) -> bool {
        self.is_initializer
    }

    /// Produce a copy of this method whose closure has one extra frame
    /// binding `this` to `instance`.
    pub fn bind(&self, instance: Rc<RefCell<Instance>>) -> Function {
        let env: EnvRef = Environment::child_of(&self.closure);
        env.borrow_mut().define("this", Value::Instance(instance));

        Function::new(Rc::clone(&self.declaration), env, self.is_initializer)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

// The closure may (indirectly) contain this very function, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .field("is_initializer", &self.is_initializer)
            .finish()
    }
}
