//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Category`] used to decide how an error is surfaced to callers.

use ariadne::{Color, Report, Source};
use std::{fmt::{self, Debug}, ops::Range};

#[cfg(test)]
extern crate self as gamma_error;

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// The broad class an error belongs to.
///
/// The card layer surfaces errors differently depending on their category: value errors are shown
/// with their message only, syntax errors with their position, and everything else as a trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    /// The source text could not be parsed.
    Syntax,

    /// A name was used before it was defined.
    Name,

    /// An operation was applied to a value of the wrong type.
    Type,

    /// An operation received a value of the right type but an unusable value.
    Value,

    /// Division or modulo by zero.
    ZeroDivision,

    /// The engine has no algorithm for the requested operation.
    NotImplemented,

    /// The maximum call depth was exceeded.
    Recursion,

    /// The evaluation step budget ran out.
    Timeout,

    /// A key was missing from a mapping.
    Key,

    /// A sequence index was out of range.
    Index,

    /// Anything else.
    #[default]
    Internal,
}

impl Category {
    /// Returns the name used for this category in traces, such as `ValueError`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Syntax => "SyntaxError",
            Self::Name => "NameError",
            Self::Type => "TypeError",
            Self::Value => "ValueError",
            Self::ZeroDivision => "ZeroDivisionError",
            Self::NotImplemented => "NotImplementedError",
            Self::Recursion => "RecursionError",
            Self::Timeout => "TimeoutError",
            Self::Key => "KeyError",
            Self::Index => "IndexError",
            Self::Internal => "RuntimeError",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send {
    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;

    /// The one-line message of this error, without any source highlighting.
    fn message(&self) -> String;

    /// The category of this error.
    fn category(&self) -> Category {
        Category::Internal
    }
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// The one-line message of this error.
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// The category of this error.
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// The start of the first span, if any.
    pub fn offset(&self) -> Option<usize> {
        self.spans.first().map(|span| span.start)
    }

    /// Renders the full report for the given source to a string.
    pub fn render(&self, src_id: &str, source: &str) -> String {
        let mut out = Vec::new();
        let written = self
            .build_report(src_id)
            .write((src_id, Source::from(source)), &mut out);
        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.message(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use gamma_attrs::ErrorKind;
    use pretty_assertions::assert_eq;
    use super::*;

    #[derive(Debug, ErrorKind)]
    #[error(
        message = format!("`{}` is not defined", self.name),
        labels = ["this name"],
        category = Name,
    )]
    struct Undefined {
        name: String,
    }

    #[derive(Debug, ErrorKind)]
    #[error(message = "unexpected end of input", labels = [""])]
    struct Eof;

    #[test]
    fn message_and_category() {
        let err = Error::new(vec![0..4], Undefined { name: "xxxx".to_string() });
        assert_eq!(err.message(), "`xxxx` is not defined");
        assert_eq!(err.category(), Category::Name);
        assert_eq!(err.to_string(), "NameError: `xxxx` is not defined");
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn default_category_is_internal() {
        let err = Error::new(vec![3..3], Eof);
        assert_eq!(err.category(), Category::Internal);
        assert_eq!(err.category().name(), "RuntimeError");
    }

    #[test]
    fn rendered_report_mentions_message() {
        let err = Error::new(vec![0..4], Undefined { name: "xxxx".to_string() });
        let rendered = err.render("input", "xxxx");
        assert!(rendered.contains("`xxxx` is not defined"));
    }
}
