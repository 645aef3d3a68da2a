//! One interpreter session: runs source units (a whole file, or one REPL
//! line at a time) through scan → parse → resolve → interpret.
//!
//! Error state belongs to a single [`Session::run`] call.  Static errors of
//! one run never leak into the next, while interpreter state (globals,
//! closures, classes) does persist across runs.

use std::fmt;
use std::io::{self, Write};

use log::{debug, info};
use thiserror::Error;

use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

/// Why a run did not complete.
#[derive(Debug, Error)]
pub enum RunError {
    /// Lexical, syntax or resolution diagnostics; nothing was executed.
    #[error("{}", Diagnostics(.0))]
    Static(Vec<LoxError>),

    /// Execution started and was aborted.
    #[error(transparent)]
    Runtime(LoxError),
}

/// Newline‑separated rendering of a diagnostic list.
struct Diagnostics<'a>(&'a [LoxError]);

impl fmt::Display for Diagnostics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }

        Ok(())
    }
}

pub struct Session<W: Write = io::Stdout> {
    interpreter: Interpreter<W>,
}

impl Session<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Session<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Session<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    pub fn output(&self) -> &W {
        self.interpreter.output()
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Run one unit of source.  Lexical and syntax diagnostics are gathered
    /// together; resolution only happens when there are none, and execution
    /// only when resolution is clean too.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        info!("Run started over {} bytes", source.len());

        let (tokens, mut errors) = Scanner::new(source).scan_tokens();

        let (statements, syntax_errors) = Parser::new(&tokens).parse();
        errors.extend(syntax_errors);

        if !errors.is_empty() {
            debug!("Skipping execution: {} front-end error(s)", errors.len());

            return Err(RunError::Static(errors));
        }

        let (locals, static_errors) = Resolver::new().resolve(&statements);

        if !static_errors.is_empty() {
            debug!(
                "Skipping execution: {} resolution error(s)",
                static_errors.len()
            );

            return Err(RunError::Static(static_errors));
        }

        self.interpreter
            .interpret(&statements, &locals)
            .map_err(RunError::Runtime)?;

        info!("Run finished");

        Ok(())
    }
}
