use std::{error::Error, fmt};

/// Reading or advancing a cursor that is already at end of input is a
/// contract violation by the caller, not an ordinary parse failure, so it
/// is reported through this error rather than through a `ParseResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    EndOfInput { action: &'static str },
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EndOfInput { action } => {
                write!(f, "EndOfInput: (action='{action}')")?
            }
        };
        Ok(())
    }
}

impl Error for CursorError {}
