use crate::cursor::Cursor;
use crate::logging::Loggable;
use crate::parser::{ParseResult, Parser};

/// The generic single-character matcher every other primitive is built on.
///
/// `description` names the expected input class and becomes the expectation
/// attached to any failure. A mismatch leaves the cursor where it was.
pub fn char_match(
    predicate: impl Fn(char) -> bool + 'static,
    description: impl Into<String>,
) -> Parser<char> {
    let description = description.into();
    Parser::new(move |input: Cursor<'_>| {
        input.log_inputs("char_match", &description);
        let Some((current, advanced)) = input.step() else {
            let e = "Unexpected end of input";
            input.log_failure("char_match", &description, &e);
            return ParseResult::fail(input, e, [description.clone()]);
        };
        if predicate(current.value()) {
            input.log_success("char_match", current.value());
            ParseResult::success(current.value(), advanced)
        } else {
            let e = format!("Unexpected {}", current.value());
            input.log_failure("char_match", &description, &e);
            ParseResult::fail(input, e, [description.clone()])
        }
    })
}

/// Matches exactly `ch`.
pub fn char_is(ch: char) -> Parser<char> {
    char_match(move |c| c == ch, ch.to_string())
}

pub fn digit() -> Parser<char> {
    char_match(|c| c.is_ascii_digit(), "[0-9]")
}

pub fn letter() -> Parser<char> {
    char_match(|c| c.is_alphabetic(), "[A-Za-z]")
}

pub fn letter_or_digit() -> Parser<char> {
    char_match(|c| c.is_alphanumeric(), "Letter or digit")
}

pub fn whitespace() -> Parser<char> {
    char_match(|c| c.is_whitespace(), "Whitespace")
}

pub fn any_char() -> Parser<char> {
    char_match(|_| true, "Any char")
}

/// Matches `ch` in either case, comparing case-folded forms.
pub fn any_case_char(ch: char) -> Parser<char> {
    char_match(
        move |c| c.to_ascii_lowercase() == ch.to_ascii_lowercase(),
        format!("{} or {}", ch.to_ascii_uppercase(), ch.to_ascii_lowercase()),
    )
}

pub fn any_char_except(ch: char) -> Parser<char> {
    char_match(move |c| c != ch, format!("Char should not = {ch}"))
}

/// Matches `literal` character by character. The first mismatch fails the
/// whole literal from the original cursor, with one composite expectation
/// naming it; per-character diagnostics are discarded so the failure
/// position is deterministic.
pub fn text(literal: impl Into<String>) -> Parser<String> {
    let literal = literal.into();
    Parser::new(move |input: Cursor<'_>| {
        input.log_inputs("text", &literal);
        let mut current = input;
        for expected in literal.chars() {
            match current.step() {
                Some((ch, next)) if ch.value() == expected => current = next,
                _ => {
                    let e = format!("Expected string of {literal}");
                    input.log_failure("text", &literal, &e);
                    return ParseResult::fail(input, e, [format!("{literal:?}")]);
                }
            }
        }
        input.log_success("text", &literal);
        ParseResult::success(literal.clone(), current)
    })
}

impl Parser<Vec<char>> {
    /// Concatenates the produced characters into owned text. Any underlying
    /// failure is replaced by one fixed message; detail is lost at this
    /// layer on purpose.
    pub fn string(&self) -> Parser<String> {
        let lhs = self.clone();
        Parser::new(move |input: Cursor<'_>| match lhs.parse(input) {
            ParseResult::Success { value, remainder } => {
                let text: String = value.into_iter().collect();
                remainder.log_success_with_result("----> string", "", &text);
                ParseResult::success(text, remainder)
            }
            ParseResult::Failure(..) => ParseResult::fail(
                input,
                "Expected sequence of characters",
                std::iter::empty(),
            ),
        })
    }

    /// `string` plus integer conversion.
    ///
    /// # Panics
    ///
    /// Panics when the produced characters do not form a valid `i64`. Only
    /// feed this sequences already constrained to digits, e.g.
    /// `digit().one_or_more()`; that is a grammar invariant, not something
    /// checked here.
    pub fn numeric(&self) -> Parser<i64> {
        self.string().select(|text| {
            text.parse()
                .unwrap_or_else(|_| panic!("numeric applied to non-numeric text {text:?}"))
        })
    }
}

impl Parser<String> {
    /// Trims leading and trailing whitespace from the produced text.
    pub fn token(&self) -> Parser<String> {
        self.select(|text| text.trim().to_string())
    }
}
