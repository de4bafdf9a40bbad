use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raised by [`crate::Args`] helpers while a constructor unpacks its arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArgsError {
    Missing(String),
    Unexpected(String),
    Duplicate(String),
    TooMany { expected: usize, got: usize },
    Invalid(String),
}

impl Error for ArgsError {}

impl Display for ArgsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgsError::Missing(m) => write!(f, "Missing Argument: {m}"),
            ArgsError::Unexpected(m) => write!(f, "Unexpected Argument: {m}"),
            ArgsError::Duplicate(m) => write!(f, "Argument given twice: {m}"),
            ArgsError::TooMany { expected, got } => write!(
                f,
                "Too many arguments, expected at most {expected} positional argument{}, got {got}",
                if *expected == 1 { "" } else { "s" }
            ),
            ArgsError::Invalid(m) => write!(f, "Invalid Arguments: {m}"),
        }
    }
}
