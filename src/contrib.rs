// \b[A-Z0-9._%+-]+@[A-Z0-9.-]+\b

use once_cell::sync::Lazy;

use crate::prelude::*;

/// `[A-Za-z][A-Za-z0-9]*`
pub fn identifier() -> Parser<String> {
    letter().then(|first| {
        letter_or_digit()
            .zero_or_more()
            .string()
            .select(move |rest| format!("{first}{rest}"))
    })
}

/// One or more digits converted to `i64`.
pub fn integer() -> Parser<i64> {
    digit().one_or_more().numeric()
}

pub fn email() -> Parser<String> {
    static NAME: Lazy<Vec<char>> = Lazy::new(|| {
        ('A'..='Z')
            .chain('0'..='9')
            .chain(['.', '_', '%', '+', '-'])
            .collect()
    });
    static DOMAIN: Lazy<Vec<char>> =
        Lazy::new(|| ('A'..='Z').chain('0'..='9').chain(['.', '-']).collect());

    let name = char_match(|c| NAME.contains(&c.to_ascii_uppercase()), "email name")
        .one_or_more()
        .string();
    let domain = char_match(|c| DOMAIN.contains(&c.to_ascii_uppercase()), "email domain")
        .one_or_more()
        .string();
    name.select_many(move |_| text("@"), |user, _| user)
        .select_many(move |_| domain.clone(), |user, dom| format!("{user}@{dom}"))
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use test_log::test;

    #[test]
    fn test_identifier() {
        let result = identifier().parse(cy::Cursor::from("id0 rest"));
        assert_eq!(result.into_value(), Some("id0".to_string()));
        assert!(!identifier().parse(cy::Cursor::from("0id")).is_success());
    }

    #[test]
    fn test_integer() {
        let result = integer().parse(cy::Cursor::from("1234,"));
        assert_eq!(result.remainder().pos(), 4);
        assert_eq!(result.into_value(), Some(1234));
        assert!(!integer().parse(cy::Cursor::from("x")).is_success());
    }

    #[test]
    fn test_email() {
        let result = email().parse(cy::Cursor::from("andy@google.com"));
        assert!(result.is_success());
        assert!(result.remainder().is_eof());
        assert_eq!(result.into_value(), Some("andy@google.com".to_string()));
        assert!(!email().parse(cy::Cursor::from("google.com")).is_success());
    }
}
