//! Joins retrieved passages into the context block of the answer prompt.

/// Separator placed between passages.
pub const PASSAGE_SEPARATOR: &str = "\n\n";

/// Join passages with a blank line, keeping their order.
///
/// An empty slice yields an empty string.
pub fn format_passages<S: AsRef<str>>(passages: &[S]) -> String {
    passages.iter().map(|p| p.as_ref()).collect::<Vec<&str>>().join(PASSAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_empty_string() {
        let none: [&str; 0] = [];
        assert_eq!(format_passages(&none), "");
    }

    #[test]
    fn joins_with_blank_line() {
        assert_eq!(format_passages(&["a", "b"]), "a\n\nb");
        assert_eq!(format_passages(&[String::from("only")]), "only");
    }

    #[test]
    fn order_is_preserved() {
        assert_eq!(format_passages(&["3", "1", "2"]), "3\n\n1\n\n2");
    }
}
