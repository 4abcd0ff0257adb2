//! Centralised error hierarchy for the **Lox interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow`, while still preserving rich diagnostic detail.
//!
//! The module **does not** print diagnostics itself.  Printing is the job of a
//! [`Reporter`], the sink injected by whoever drives a [`Session`].
//!
//! [`Session`]: crate::session::Session

use std::fmt;
use std::io;
use thiserror::Error;

use log::info;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        /// `" at end"` or `" at '<lexeme>'"`.
        location: String,
    },

    /// Static‑analysis failure detected by the resolver.
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime evaluation error.  Aborts the current run.
    #[error("{message}\n[line {line}]")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Positional context for a diagnostic attached to `token`.
fn location_of(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        LoxError::Resolve {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: line={}, msg={}", token.line, message);

        LoxError::Runtime {
            message,
            line: token.line,
        }
    }

    /// Forward this error to `reporter` using the `(line, location, message)`
    /// shape for static errors and `(line, message)` for everything else.
    pub fn report(&self, reporter: &mut dyn Reporter) {
        match self {
            LoxError::Lex { message, line } => reporter.error(*line, "", message),

            LoxError::Parse {
                message,
                line,
                location,
            }
            | LoxError::Resolve {
                message,
                line,
                location,
            } => reporter.error(*line, location, message),

            LoxError::Runtime { message, line } => reporter.runtime_error(*line, message),

            // Host I/O failures surface as runtime errors without a source line.
            LoxError::Io(e) => reporter.runtime_error(0, &e.to_string()),
            LoxError::Utf8(e) => reporter.runtime_error(0, &e.to_string()),
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

// ─────────────────────────────────────────────────────────────────────────────
// Reporting sinks
// ─────────────────────────────────────────────────────────────────────────────

/// Destination for diagnostics produced while running a program.
pub trait Reporter {
    /// A static (lexical, syntactic or resolution) error.  `location` is empty,
    /// `" at end"`, or `" at '<lexeme>'"`.
    fn error(&mut self, line: usize, location: &str, message: &str);

    /// An uncaught runtime error that aborted the current run.
    fn runtime_error(&mut self, line: usize, message: &str);
}

/// Prints diagnostics to standard error in the classic Lox format.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn error(&mut self, line: usize, location: &str, message: &str) {
        eprintln!("[line {}] Error{}: {}", line, location, message);
    }

    fn runtime_error(&mut self, line: usize, message: &str) {
        eprintln!("{}\n[line {}]", message, line);
    }
}

/// One diagnostic captured by a [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Static {
        line: usize,
        location: String,
        message: String,
    },
    Runtime {
        line: usize,
        message: String,
    },
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::Static { line, .. } | Diagnostic::Runtime { line, .. } => *line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Diagnostic::Static { message, .. } | Diagnostic::Runtime { message, .. } => message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Static {
                line,
                location,
                message,
            } => write!(f, "[line {}] Error{}: {}", line, location, message),

            Diagnostic::Runtime { line, message } => write!(f, "{}\n[line {}]", message, line),
        }
    }
}

/// Keeps every diagnostic in memory; used by tests and embedders.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Just the messages, in report order.
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(Diagnostic::message).collect()
    }
}

impl Reporter for CollectingReporter {
    fn error(&mut self, line: usize, location: &str, message: &str) {
        self.diagnostics.push(Diagnostic::Static {
            line,
            location: location.to_string(),
            message: message.to_string(),
        });
    }

    fn runtime_error(&mut self, line: usize, message: &str) {
        self.diagnostics.push(Diagnostic::Runtime {
            line,
            message: message.to_string(),
        });
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn error(&mut self, line: usize, location: &str, message: &str) {
        (**self).error(line, location, message)
    }

    fn runtime_error(&mut self, line: usize, message: &str) {
        (**self).runtime_error(line, message)
    }
}
