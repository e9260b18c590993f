pub mod kind;

pub use gamma_error::Error;

/// A syntax error resolved against the text it came from, in the shape the card layer reports:
/// a message, a 1-based column, and the text split at that column.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyntaxErrorInfo {
    /// The message of the error.
    pub msg: String,

    /// The 1-based column the error points at.
    pub offset: usize,

    /// The text up to and including the offending character.
    pub input_start: String,

    /// The rest of the text.
    pub input_end: String,
}

impl SyntaxErrorInfo {
    /// Resolves the given error against the text it was produced from.
    pub fn new(err: &Error, text: &str) -> Self {
        let offset = err.offset().unwrap_or(text.len()).min(text.len()) + 1;
        let split = (offset).min(text.len());
        let split = (0..=split).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
        Self {
            msg: err.message(),
            offset,
            input_start: text[..split].to_string(),
            input_end: text[split..].to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn split_at_offset() {
        let err = Error::new(vec![4..5], kind::UnexpectedEof);
        let info = SyntaxErrorInfo::new(&err, "x + )");
        assert_eq!(info.offset, 5);
        assert_eq!(info.input_start, "x + )");
        assert_eq!(info.input_end, "");
    }

    #[test]
    fn split_in_the_middle() {
        let err = Error::new(vec![2..3], kind::ExpectedEof);
        let info = SyntaxErrorInfo::new(&err, "ab cd");
        assert_eq!(info.offset, 3);
        assert_eq!(info.input_start, "ab ");
        assert_eq!(info.input_end, "cd");
        assert_eq!(info.msg, "expected end of input");
    }
}
