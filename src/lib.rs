//! A tree-walking interpreter for Lox.
//!
//! Pipeline: [`scanner`] → [`parser`] → [`resolver`] → [`interpreter`], with
//! [`session::Session`] chaining them for hosts.

pub mod ast;
pub mod ast_printer;
pub mod class;
pub mod environment;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod session;
pub mod token;
pub mod value;

pub use error::{CollectingReporter, LoxError, Reporter, Result, StderrReporter};
pub use session::{RunStatus, Session};
