use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use log::log_enabled;
use log::Level::Trace;

use crate::cursor::Cursor;
use crate::logging::Loggable;
use crate::{util, LABEL, LOG_TARGET};

/// A failed parse: where it stopped, what went wrong, and what would have
/// been accepted instead. Failures are ordinary values, combined by `or`
/// and propagated by `then`, never a non-local abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure<'s> {
    pub(crate) remainder: Cursor<'s>,
    pub(crate) message: String,
    pub(crate) expectations: BTreeSet<String>,
}

impl<'s> Failure<'s> {
    pub fn remainder(&self) -> Cursor<'s> {
        self.remainder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expectations(&self) -> &BTreeSet<String> {
        &self.expectations
    }

    /// Furthest-failure selection: the failure that consumed more input
    /// wins; on a tie, keep the left message and union the expectations.
    pub(crate) fn best_of(lhs: Failure<'s>, rhs: Failure<'s>) -> Failure<'s> {
        use std::cmp::Ordering::*;
        match rhs.remainder.pos().cmp(&lhs.remainder.pos()) {
            Greater => rhs,
            Less => lhs,
            Equal => {
                let mut expectations = lhs.expectations;
                expectations.extend(rhs.expectations);
                Failure {
                    remainder: lhs.remainder,
                    message: lhs.message,
                    expectations,
                }
            }
        }
    }
}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "line {}, column {}: {}",
            self.remainder.line(),
            self.remainder.column(),
            self.message
        )?;
        if !self.expectations.is_empty() {
            let expected: Vec<&str> = self.expectations.iter().map(String::as_str).collect();
            write!(f, " (expected {})", expected.join(" or "))?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure<'_> {}

/// Outcome of applying a parser to a cursor. A success carries the produced
/// value and the remainder cursor; a failure carries no value at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult<'s, T> {
    Success { value: T, remainder: Cursor<'s> },
    Failure(Failure<'s>),
}

impl<'s, T> ParseResult<'s, T> {
    pub fn success(value: T, remainder: Cursor<'s>) -> Self {
        Self::Success { value, remainder }
    }

    pub fn fail(
        remainder: Cursor<'s>,
        message: impl Into<String>,
        expectations: impl IntoIterator<Item = String>,
    ) -> Self {
        Self::Failure(Failure {
            remainder,
            message: message.into(),
            expectations: expectations.into_iter().collect(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure(..) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure(..) => None,
        }
    }

    /// The cursor left over by the attempt, on either outcome.
    pub fn remainder(&self) -> Cursor<'s> {
        match self {
            Self::Success { remainder, .. } => *remainder,
            Self::Failure(failure) => failure.remainder,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(&failure.message),
        }
    }

    pub fn expectations(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(&failure.expectations),
        }
    }

    pub fn as_failure(&self) -> Option<&Failure<'s>> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Continue from a success; a failure flows through untouched, retyped
    /// to the continuation's result (failures carry no value, so this is
    /// free).
    pub fn if_success<U>(
        self,
        next: impl FnOnce(T, Cursor<'s>) -> ParseResult<'s, U>,
    ) -> ParseResult<'s, U> {
        match self {
            Self::Success { value, remainder } => next(value, remainder),
            Self::Failure(failure) => ParseResult::Failure(failure),
        }
    }

    /// Recover from a failure; a success flows through untouched.
    pub fn if_failure(
        self,
        next: impl FnOnce(Failure<'s>) -> ParseResult<'s, T>,
    ) -> ParseResult<'s, T> {
        match self {
            success @ Self::Success { .. } => success,
            Self::Failure(failure) => next(failure),
        }
    }
}

type ParserFn<T> = dyn for<'s> Fn(Cursor<'s>) -> ParseResult<'s, T>;

/// A parser is a pure function from cursor to result. Parsers hold no
/// mutable state, so one value can be shared and re-invoked any number of
/// times; cloning is a cheap handle copy.
pub struct Parser<T> {
    f: Rc<ParserFn<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser { f: Rc::clone(&self.f) }
    }
}

impl<T: 'static> Parser<T> {
    pub fn new(f: impl for<'s> Fn(Cursor<'s>) -> ParseResult<'s, T> + 'static) -> Self {
        Parser { f: Rc::new(f) }
    }

    pub fn parse<'s>(&self, input: Cursor<'s>) -> ParseResult<'s, T> {
        (self.f)(input)
    }

    /// Succeeds with `value` without consuming any input.
    pub fn ret(value: T) -> Parser<T>
    where
        T: Clone,
    {
        Parser::new(move |input: Cursor<'_>| ParseResult::success(value.clone(), input))
    }

    /// Monadic bind: on success, feed the value to `f` and resume parsing
    /// from the remainder; on failure, propagate the failure unchanged.
    pub fn then<U: 'static>(&self, f: impl Fn(T) -> Parser<U> + 'static) -> Parser<U> {
        let lhs = self.clone();
        Parser::new(move |input: Cursor<'_>| {
            lhs.parse(input)
                .if_success(|value, remainder| f(value).parse(remainder))
        })
    }

    /// Alternation. The right side only runs if the left fails, and it runs
    /// from the original cursor. When both fail, the failure that consumed
    /// more input is kept as the more informative diagnostic; on a tie the
    /// expectation sets are merged.
    pub fn or(&self, rhs: &Parser<T>) -> Parser<T> {
        let lhs = self.clone();
        let rhs = rhs.clone();
        Parser::new(move |input: Cursor<'_>| match lhs.parse(input) {
            success @ ParseResult::Success { .. } => success,
            ParseResult::Failure(lhs_failure) => rhs.parse(input).if_failure(|rhs_failure| {
                ParseResult::Failure(Failure::best_of(lhs_failure, rhs_failure))
            }),
        })
    }

    /// Map: a bind whose continuation consumes no input.
    pub fn select<U: 'static>(&self, convert: impl Fn(T) -> U + 'static) -> Parser<U> {
        let lhs = self.clone();
        Parser::new(move |input: Cursor<'_>| {
            lhs.parse(input)
                .if_success(|value, remainder| ParseResult::success(convert(value), remainder))
        })
    }

    /// Dependent sequencing: parse `self`, build the next parser from its
    /// value, then combine both values with `projector`. Two nested binds,
    /// nothing more.
    pub fn select_many<U: 'static, V: 'static>(
        &self,
        selector: impl Fn(T) -> Parser<U> + 'static,
        projector: impl Fn(T, U) -> V + 'static,
    ) -> Parser<V>
    where
        T: Clone,
    {
        let projector = Rc::new(projector);
        self.then(move |value: T| {
            let projector = Rc::clone(&projector);
            let carried = value.clone();
            selector(value).select(move |u| projector(carried.clone(), u))
        })
    }

    /// Applies the element parser until end of input or the first element
    /// failure. Never fails; the collected values may be empty.
    pub fn zero_or_more(&self) -> Parser<Vec<T>> {
        let element = self.clone();
        Parser::new(move |input: Cursor<'_>| {
            let mut current = input;
            let mut values = Vec::new();
            loop {
                if current.is_eof() {
                    break;
                }
                match element.parse(current) {
                    ParseResult::Success { value, remainder } => {
                        values.push(value);
                        current = remainder;
                    }
                    ParseResult::Failure(..) => break,
                }
            }
            current.log_success("----> zero_or_more, len", values.len());
            ParseResult::success(values, current)
        })
    }

    /// Like `zero_or_more` but the first element must match.
    pub fn one_or_more(&self) -> Parser<Vec<T>> {
        let element = self.clone();
        let rest = self.zero_or_more();
        Parser::new(move |input: Cursor<'_>| match element.parse(input) {
            ParseResult::Success { value, remainder } => {
                rest.parse(remainder).if_success(|mut values, remainder| {
                    values.insert(0, value);
                    ParseResult::success(values, remainder)
                })
            }
            ParseResult::Failure(..) => {
                let e = format!(
                    "Expected 1 or more {}",
                    util::type_suffix(std::any::type_name::<T>())
                );
                input.log_failure("one_or_more", "", &e);
                ParseResult::fail(input, e, std::iter::empty())
            }
        })
    }

    /// Stamps `span_name` onto subsequent trace lines, to tell nested
    /// grammar rules apart in the log output.
    pub fn debug_context(&self, span_name: &'static str) -> Parser<T> {
        let inner = self.clone();
        Parser::new(move |input: Cursor<'_>| {
            if log_enabled!(target: LOG_TARGET, Trace) {
                LABEL.with(|f| f.set("")); // blank the span name before logging
                input.log_success("debug_context", span_name);
                LABEL.with(|f| f.set(span_name));
            }
            inner.parse(input)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::prelude::*;
    use test_log::test;

    /// A parser that counts its invocations, for checking evaluation order.
    fn counting_parser(calls: &Rc<Cell<usize>>, outcome: ParseResult<'static, char>) -> Parser<char> {
        let calls = Rc::clone(calls);
        Parser::new(move |input: cy::Cursor<'_>| {
            calls.set(calls.get() + 1);
            match &outcome {
                ParseResult::Success { value, .. } => ParseResult::success(*value, input),
                ParseResult::Failure(f) => {
                    ParseResult::fail(input, f.message(), f.expectations().iter().cloned())
                }
            }
        })
    }

    #[test]
    fn test_ret_always_works() {
        let result = Parser::ret("works").parse(cy::Cursor::from(""));
        assert!(result.is_success());
        assert_eq!(result.into_value(), Some("works"));
    }

    #[test]
    fn test_ret_consumes_nothing() {
        let result = Parser::ret(42).parse(cy::Cursor::from("abc"));
        assert_eq!(result.remainder().pos(), 0);
    }

    #[test]
    fn test_then_sequences() {
        let pair = char_is('a').then(|first| char_is('b').select(move |second| (first, second)));
        let result = pair.parse(cy::Cursor::from("abc"));
        assert_eq!(result.into_value(), Some(('a', 'b')));
    }

    #[test]
    fn test_then_propagates_failure_unchanged() {
        let p = digit().then(|_| Parser::ret("never"));
        let result = p.parse(cy::Cursor::from("x"));
        assert!(!result.is_success());
        assert_eq!(result.message(), Some("Unexpected x"));
        assert_eq!(result.remainder().pos(), 0);
        assert!(result.expectations().unwrap().contains("[0-9]"));
    }

    #[test]
    fn test_or_returns_lhs_without_running_rhs() {
        let calls = Rc::new(Cell::new(0));
        let rhs = counting_parser(&calls, ParseResult::success('x', cy::Cursor::from("")));
        let combined = char_is('t').or(&rhs);
        let result = combined.parse(cy::Cursor::from("test"));
        assert_eq!(result.into_value(), Some('t'));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_or_runs_rhs_from_the_original_cursor() {
        // lhs consumes 'a' before failing; rhs must still see the 'a'
        let lhs = char_is('a').then(|_| char_is('b'));
        let rhs = char_is('a');
        let result = lhs.or(&rhs).parse(cy::Cursor::from("ac"));
        assert_eq!(result.into_value(), Some('a'));
    }

    #[test]
    fn test_or_keeps_the_furthest_failure() {
        let deep = char_is('a').then(|_| char_is('b'));
        let shallow = char_is('x');
        let result = deep.or(&shallow).parse(cy::Cursor::from("ac"));
        assert!(!result.is_success());
        assert_eq!(result.remainder().pos(), 1);
        assert_eq!(result.message(), Some("Unexpected c"));

        // symmetric: the order of the alternatives must not matter
        let result = shallow.or(&deep).parse(cy::Cursor::from("ac"));
        assert_eq!(result.remainder().pos(), 1);
        assert_eq!(result.message(), Some("Unexpected c"));
    }

    #[test]
    fn test_or_merges_expectations_on_tied_failures() {
        let result = digit().or(&letter()).parse(cy::Cursor::from("?"));
        assert!(!result.is_success());
        assert_eq!(result.message(), Some("Unexpected ?"));
        let expectations = result.expectations().unwrap();
        assert!(expectations.contains("[0-9]"));
        assert!(expectations.contains("[A-Za-z]"));
        assert_eq!(expectations.len(), 2);
    }

    #[test]
    fn test_select_transforms_the_value() {
        let result = digit()
            .select(|d| d.to_digit(10).unwrap())
            .parse(cy::Cursor::from("7!"));
        assert_eq!(result.into_value(), Some(7));
    }

    #[test]
    fn test_select_many_projects_both_values() {
        let pair = letter().select_many(|_| digit(), |l, d| format!("{l}{d}"));
        let result = pair.parse(cy::Cursor::from("a1rest"));
        assert_eq!(result.value().map(String::as_str), Some("a1"));
        assert_eq!(result.remainder().pos(), 2);
    }

    #[test]
    fn test_zero_or_more_never_fails() {
        for input in ["", "b", "bb", "bb c", "123"] {
            let result = letter().zero_or_more().parse(cy::Cursor::from(input));
            assert!(result.is_success(), "input: {input:?}");
        }
        let result = letter().zero_or_more().parse(cy::Cursor::from("ab1"));
        assert_eq!(result.into_value(), Some(vec!['a', 'b']));
    }

    #[test]
    fn test_one_or_more_fails_only_on_the_first_element() {
        for input in ["", " something more"] {
            let result = letter().one_or_more().parse(cy::Cursor::from(input));
            assert!(!result.is_success(), "input: {input:?}");
        }
        for input in ["S", "Should pass"] {
            let result = letter().one_or_more().parse(cy::Cursor::from(input));
            assert!(result.is_success(), "input: {input:?}");
        }
    }

    #[test]
    fn test_one_or_more_failure_names_the_element_kind() {
        let result = letter().one_or_more().parse(cy::Cursor::from("123"));
        assert_eq!(result.message(), Some("Expected 1 or more char"));
        assert!(result.expectations().unwrap().is_empty());
    }

    #[test]
    fn test_parsers_are_reusable() {
        let p = digit().one_or_more().debug_context("digits");
        let first = p.parse(cy::Cursor::from("12x"));
        let second = p.parse(cy::Cursor::from("12x"));
        assert_eq!(first.into_value(), second.into_value());
    }

    #[test]
    fn test_failure_display_reports_position() {
        let result = digit().parse(cy::Cursor::from("a\nz").advance().unwrap());
        let failure = result.as_failure().unwrap();
        assert_eq!(
            failure.to_string(),
            "line 2, column 1: Unexpected z (expected [0-9])"
        );
    }
}
