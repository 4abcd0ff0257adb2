//! The entry points a host drives (scan and parse, resolve, interpret),
//! bundled with the state that has to survive between them.
//!
//! A [`Session`] owns one interpreter, so globals defined by one
//! [`run`](Session::run) are visible to the next (this is what the
//! interactive prompt relies on).  Error flags are plain return values:
//! nothing is remembered between runs, so every submission starts clean.

use std::io::{self, Write};

use log::{debug, info};

use crate::ast::Stmt;
use crate::error::{LoxError, Reporter};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;

/// Outcome of a [`Session::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    /// Lexical, syntax or resolution errors; nothing was executed.
    StaticError,
    /// Execution started and was aborted by a runtime error.
    RuntimeError,
}

impl RunStatus {
    /// Conventional process exit code (sysexits `EX_DATAERR` / `EX_SOFTWARE`).
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Ok => 0,
            RunStatus::StaticError => 65,
            RunStatus::RuntimeError => 70,
        }
    }
}

pub struct Session<W: Write, R: Reporter> {
    interpreter: Interpreter<W>,
    reporter: R,
    next_id: usize,
}

impl<R: Reporter> Session<io::Stdout, R> {
    /// A session printing program output to standard output.
    pub fn stdout(reporter: R) -> Self {
        Self::new(io::stdout(), reporter)
    }
}

impl<W: Write, R: Reporter> Session<W, R> {
    pub fn new(out: W, reporter: R) -> Self {
        info!("Session created");

        Self {
            interpreter: Interpreter::with_output(out),
            reporter,
            next_id: 0,
        }
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Program output written so far.
    pub fn output(&self) -> &W {
        self.interpreter.output()
    }

    /// Scan and parse one translation unit.  Every lexical and syntax error is
    /// reported; the flag says whether there were any.
    pub fn scan_and_parse(&mut self, source: &str) -> (Vec<Stmt>, bool) {
        let (tokens, lex_errors) = scan_tokens(source);

        let mut parser = Parser::with_id_base(tokens, self.next_id);
        let (statements, parse_errors) = parser.parse();
        self.next_id = parser.next_id();

        let had_error = !lex_errors.is_empty() || !parse_errors.is_empty();

        // Scanner diagnostics first, mirroring source order per phase.
        self.report_all(&lex_errors);
        self.report_all(&parse_errors);

        (statements, had_error)
    }

    /// Resolve `statements` and hand the distance table to the interpreter.
    /// Returns `true` if any resolution error was reported.
    pub fn resolve(&mut self, statements: &[Stmt]) -> bool {
        match Resolver::new().resolve(statements) {
            Ok(locals) => {
                self.interpreter.add_locals(locals);
                false
            }
            Err(errors) => {
                self.report_all(&errors);
                true
            }
        }
    }

    /// Execute `statements`.  Returns `true` if a runtime error aborted the run.
    pub fn interpret(&mut self, statements: &[Stmt]) -> bool {
        match self.interpreter.interpret(statements) {
            Ok(()) => false,
            Err(e) => {
                e.report(&mut self.reporter);
                true
            }
        }
    }

    /// Full pipeline for one source text.
    pub fn run(&mut self, source: &str) -> RunStatus {
        let (statements, had_syntax_error) = self.scan_and_parse(source);

        if had_syntax_error {
            debug!("Syntax errors; skipping resolution");
            return RunStatus::StaticError;
        }

        if self.resolve(&statements) {
            debug!("Resolution errors; skipping execution");
            return RunStatus::StaticError;
        }

        if self.interpret(&statements) {
            return RunStatus::RuntimeError;
        }

        RunStatus::Ok
    }

    fn report_all(&mut self, errors: &[LoxError]) {
        for e in errors {
            e.report(&mut self.reporter);
        }
    }
}
