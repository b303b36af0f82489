//! Line-oriented processing: one postfix expression per input line, one
//! rendered block per expression.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::{compiler::Compiler, render::render_block, CompileError};

/// Diagnostic printed when the input file cannot be read
pub const INPUT_DIAGNOSTIC: &str = "Error reading input file.";

/// Diagnostic printed for a malformed expression
pub const MALFORMED_DIAGNOSTIC: &str = "Invalid expression!";

/// How the driver reacts to bad input lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    skip_malformed: bool,
}

impl Config {
    /// Return a new default config: abort on the first malformed line.
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, a malformed line prints the diagnostic in place of
    /// its table and processing continues with the next line.
    pub fn skip_malformed(mut self, yes: bool) -> Self {
        self.skip_malformed = yes;
        self
    }

    pub fn get_skip_malformed(&self) -> bool {
        self.skip_malformed
    }
}

/// Counts from one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub compiled: usize,
    pub skipped: usize,
}

/// Errors that stop a run
#[derive(Debug)]
pub enum Error {
    /// The input could not be opened or read
    InputUnavailable { path: Option<PathBuf>, source: io::Error },
    /// A line is not a well-formed postfix expression
    Malformed {
        line: usize,
        expression: String,
        source: CompileError,
    },
    /// The rendered output could not be written
    Output(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputUnavailable { path: Some(path), .. } => {
                write!(f, "cannot read input file {}", path.display())
            }
            Error::InputUnavailable { path: None, .. } => write!(f, "cannot read input"),
            Error::Malformed { line, expression, .. } => {
                write!(f, "line {}: invalid expression {:?}", line, expression)
            }
            Error::Output(_) => write!(f, "cannot write output"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InputUnavailable { source, .. } => Some(source),
            Error::Malformed { source, .. } => Some(source),
            Error::Output(err) => Some(err),
        }
    }
}

/// Compiles and renders every line of an input
#[derive(Debug, Clone, Default)]
pub struct Driver {
    config: Config,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Process the file at `path`
    pub fn run_path<P: AsRef<Path>, W: Write>(&self, path: P, out: W) -> Result<Summary, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::InputUnavailable {
            path: Some(path.to_path_buf()),
            source,
        })?;
        self.run(BufReader::new(file), out).map_err(|err| match err {
            Error::InputUnavailable { path: None, source } => Error::InputUnavailable {
                path: Some(path.to_path_buf()),
                source,
            },
            err => err,
        })
    }

    /// Process every line of `input`, writing one block per line to `out`.
    ///
    /// Each line is compiled with a fresh [`Compiler`], so state ids start
    /// at 0 for every expression.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut out: W) -> Result<Summary, Error> {
        let mut summary = Summary::default();

        for (index, line) in input.lines().enumerate() {
            let line = line.map_err(|source| Error::InputUnavailable { path: None, source })?;
            let expr = line.strip_suffix('\r').unwrap_or(&line);
            let lineno = index + 1;

            match Compiler::new().compile(expr) {
                Ok(automaton) => {
                    out.write_all(render_block(expr, &automaton).as_bytes())
                        .map_err(Error::Output)?;
                    summary.compiled += 1;
                }
                Err(source) if self.config.skip_malformed && source.is_malformed() => {
                    log::warn!("line {}: skipping {:?}: {}", lineno, expr, source);
                    writeln!(out, "{}\n{}", expr, MALFORMED_DIAGNOSTIC).map_err(Error::Output)?;
                    writeln!(out, "{}", crate::render::SEPARATOR).map_err(Error::Output)?;
                    summary.skipped += 1;
                }
                Err(source) => {
                    return Err(Error::Malformed {
                        line: lineno,
                        expression: expr.to_string(),
                        source,
                    });
                }
            }
        }

        log::debug!("processed {} expressions, skipped {}", summary.compiled, summary.skipped);
        Ok(summary)
    }
}
