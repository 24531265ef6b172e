//! Fatal errors raised by the no-arg synthesis pass.
//!
//! There is exactly one recoverable-shaped error surface here, and it is not
//! actually recoverable: a marked class whose superclass offers no no-arg
//! constructor cannot be lowered, and the enclosing compilation aborts.
//! Everything else the pass could trip over (a class declaration inside an
//! initializer block about to be duplicated) is a violated compiler
//! invariant and fails as an assertion instead.

use std::fmt;

/// A fatal condition that aborts the pass.
#[derive(Debug)]
pub enum NoArgError {
    /// The nearest unmarked class-kind ancestor of a marked class declares
    /// no constructor callable with zero arguments.
    NoSuperConstructor {
        /// Rendered declaration of the class being lowered.
        class: String,
        /// Rendered constructors the superclass actually declares.
        candidates: Vec<String>,
    },
}

impl fmt::Display for NoArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoArgError::NoSuperConstructor { class, candidates } => {
                write!(f, "No no-arg super constructor for {class}:")?;
                for candidate in candidates {
                    write!(f, "\n{candidate}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for NoArgError {}
