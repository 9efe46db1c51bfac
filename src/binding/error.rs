//! Structured errors for host-array validation.

use std::fmt;

/// Why a render request was refused. Each variant maps to one of the
/// host-facing mnemonics returned by [`BindingError::mnemonic`].
#[derive(Debug, Clone, PartialEq)]
pub enum BindingError {
    /// Wrong number of input arguments.
    InputCount { expected: usize, actual: usize },
    /// Wrong number of requested outputs.
    OutputCount { expected: usize, actual: usize },
    /// An input array has the wrong shape.
    InputShape {
        argument: &'static str,
        expected: String,
        rows: usize,
        cols: usize,
    },
    /// A host array's data length disagrees with its declared shape.
    DataLength {
        argument: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A value-level precondition failed.
    Assertion {
        argument: &'static str,
        message: String,
    },
}

impl BindingError {
    /// Short error mnemonic, e.g. `InputSizeError`.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BindingError::InputCount { .. }
            | BindingError::InputShape { .. }
            | BindingError::DataLength { .. } => "InputSizeError",
            BindingError::OutputCount { .. } => "OutputSizeError",
            BindingError::Assertion { .. } => "AssertionError",
        }
    }

    /// Fully qualified identifier `<component>:<function>:<mnemonic>`.
    pub fn identifier(&self, component: &str, function_name: &str) -> String {
        format!(
            "{}:{}:{}",
            component,
            identifier_token(function_name),
            self.mnemonic()
        )
    }
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::InputCount { expected, actual } => write!(
                f,
                "Number of inputs must be {} (got {}).",
                expected, actual
            ),
            BindingError::OutputCount { expected, actual } => write!(
                f,
                "Number of outputs must be {} (got {}).",
                expected, actual
            ),
            BindingError::InputShape {
                argument,
                expected,
                rows,
                cols,
            } => write!(
                f,
                "{} must be {} (got {}x{}).",
                argument, expected, rows, cols
            ),
            BindingError::DataLength {
                argument,
                expected,
                actual,
            } => write!(
                f,
                "{} holds {} values but its shape needs {}.",
                argument, actual, expected
            ),
            BindingError::Assertion { argument, message } => {
                write!(f, "assertion on {} failed: {}", argument, message)
            }
        }
    }
}

impl std::error::Error for BindingError {}

/// Turn a file or function name into a valid identifier token: drop the
/// extension, prefix `mex_` when it does not start with a letter, and map
/// every character outside `[A-Za-z0-9_]` to `_`.
pub fn identifier_token(name: &str) -> String {
    let stem = match name.find('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    };
    let mut token = String::with_capacity(stem.len() + 4);
    if !stem.chars().next().map_or(false, |c| c.is_ascii_alphabetic()) {
        token.push_str("mex_");
    }
    token.extend(stem.chars().map(|c| {
        if c.is_ascii_alphanumeric() || c == '_' {
            c
        } else {
            '_'
        }
    }));
    token
}
