use chicory::prelude::*;

/// Builds the grammar and parses in one go, so the benchmark covers
/// construction cost as well as the recursive descent.
pub fn parse_expr(s: &str) -> i64 {
    let integer = digit().one_or_more().numeric();
    let mid = DeferredParser::<i64>::new();
    let bracketed = char_is('(')
        .select_many(
            {
                let mid = mid.clone();
                move |_| mid.parser()
            },
            |_, value| value,
        )
        .select_many(|_| char_is(')'), |value, _| value);
    let expr = integer.or(&bracketed).debug_context("expr");
    mid.implement({
        let expr = expr.clone();
        move || expr.clone()
    });
    expr.parse(cy::Cursor::from(s))
        .into_value()
        .expect("well-formed expression")
}
