//! Runtime scopes.
//!
//! An [`Environment`] is one frame of variable bindings plus an optional link
//! to the enclosing frame.  Frames are shared through [`EnvRef`]
//! (`Rc<RefCell<_>>`): the block or call that created a frame holds one
//! reference, and every closure created inside it holds another, so a frame
//! lives as long as anything can still reach it and all holders observe the
//! same mutations.

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared, mutable handle to an environment frame.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// A root (global) frame.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap a new child of `enclosing` in a shared handle.
    pub fn child_of(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    /// Bind `name` in this frame, replacing any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Does this frame (not its ancestors) bind `name`?
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Dynamic lookup: this frame first, then outward.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Dynamic assignment: the nearest frame that already binds `name`.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Walk exactly `distance` links outward from `env`.
    pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
        let mut current: EnvRef = Rc::clone(env);

        for _ in 0..distance {
            let next: EnvRef = Rc::clone(current.borrow().enclosing.as_ref()?);
            current = next;
        }

        Some(current)
    }

    /// Read `name` from the frame exactly `distance` links outward.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
        debug!("get_at '{}' distance {}", name.lexeme, distance);

        Self::ancestor(env, distance)
            .and_then(|frame| frame.borrow().values.get(&name.lexeme).cloned())
            .ok_or_else(|| {
                LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
            })
    }

    /// Overwrite `name` in the frame exactly `distance` links outward.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
        debug!("assign_at '{}' distance {}", name.lexeme, distance);

        let frame: EnvRef = Self::ancestor(env, distance).ok_or_else(|| {
            LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
        })?;

        let mut frame = frame.borrow_mut();

        match frame.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(name: &str) -> Token {
        Token::identifier(name, 1)
    }

    #[test]
    fn get_at_skips_shadowing_frames() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));

        let inner: EnvRef = Environment::child_of(&global);
        inner.borrow_mut().define("a", Value::Number(2.0));

        assert_eq!(Environment::get_at(&inner, 0, &tok("a")).unwrap(), Value::Number(2.0));
        assert_eq!(Environment::get_at(&inner, 1, &tok("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_is_visible_through_every_alias() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("n", Value::Nil);

        let alias: EnvRef = Rc::clone(&global);
        let child: EnvRef = Environment::child_of(&global);

        Environment::assign_at(&child, 1, &tok("n"), Value::Bool(true)).unwrap();

        assert_eq!(alias.borrow().get(&tok("n")).unwrap(), Value::Bool(true));
    }

    #[test]
    fn assigning_an_undeclared_name_fails() {
        let mut env = Environment::new();
        let err = env.assign(&tok("ghost"), Value::Nil).unwrap_err();

        assert_eq!(err.to_string(), "Undefined variable 'ghost'.\n[line 1]");
    }

    #[test]
    fn define_only_touches_the_current_frame() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        let child: EnvRef = Environment::child_of(&global);

        child.borrow_mut().define("local", Value::Nil);

        assert!(child.borrow().contains("local"));
        assert!(!global.borrow().contains("local"));
    }

    #[test]
    fn distance_past_the_root_is_an_error() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));

        assert!(Environment::ancestor(&global, 1).is_none());
        assert!(Environment::get_at(&global, 3, &tok("x")).is_err());
    }
}
