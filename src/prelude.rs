pub use crate::contrib::{email, identifier, integer};
pub use crate::deferred::DeferredParser;
pub use crate::parser::{ParseResult, Parser};
pub use crate::text_parser::{
    any_case_char, any_char, any_char_except, char_is, char_match, digit, letter,
    letter_or_digit, text, whitespace,
};

pub mod cy {
    pub use crate::cursor::{Cursor, PositionedChar};
    pub use crate::error::CursorError;
    pub use crate::parser::Failure;
}
