use gamma_compute::eval::format_trace;
use gamma_error::{Category, Error};
use gamma_parser::parser::error::SyntaxErrorInfo;
use std::fmt::{self, Display, Formatter};

/// Everything that can stop a request before its cards are built.
///
/// Each variant becomes a different error card: see
/// [`Gamma::classify_and_evaluate`](crate::Gamma::classify_and_evaluate).
#[derive(Debug, Clone, PartialEq)]
pub enum CardError {
    /// The input could not be transformed into an expression at all.
    Token,

    /// The transformed input is not a valid expression.
    Syntax(SyntaxErrorInfo),

    /// Evaluation raised an error the user can act on.
    Value(String),

    /// Something went wrong that the user cannot fix. The trace is kept short.
    Internal {
        message: String,
        trace: Vec<String>,
    },

    /// No card has the requested id.
    NotFound(String),
}

impl CardError {
    /// Shorthand for a [`CardError::Value`].
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }

    /// Sorts an evaluation error of the given source into the variant its category calls for.
    pub fn from_eval(err: &Error, source: &str) -> Self {
        match err.category() {
            Category::Syntax => Self::Syntax(SyntaxErrorInfo::new(err, source)),
            Category::Internal => Self::internal(err, usize::MAX),
            _ => Self::Value(err.message()),
        }
    }

    /// Wraps an error that should never have happened, keeping at most `cap` lines of its trace.
    pub fn internal(err: &Error, cap: usize) -> Self {
        let trace = format_trace(err, 1)
            .lines()
            .take(cap)
            .map(str::to_string)
            .collect();
        Self::Internal { message: err.message(), trace }
    }

    /// Shortens the trace of an internal error to `cap` lines.
    pub fn capped(self, cap: usize) -> Self {
        match self {
            Self::Internal { message, mut trace } => {
                trace.truncate(cap);
                Self::Internal { message, trace }
            },
            other => other,
        }
    }

    /// The text shown in the `error` field of the error card.
    pub fn card_text(&self) -> String {
        match self {
            Self::Internal { trace, .. } => format!(
                "There was an error in Gamma.\nFor reference, the stack trace is:\n\n{}",
                trace.join("\n"),
            ),
            other => other.to_string(),
        }
    }
}

impl Display for CardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => f.write_str("Invalid input"),
            Self::Syntax(info) => write!(f, "{} (at column {})", info.msg, info.offset),
            Self::Value(message) => f.write_str(message),
            Self::Internal { message, .. } => write!(f, "internal error: {}", message),
            Self::NotFound(id) => write!(f, "no card is named '{}'", id),
        }
    }
}

impl std::error::Error for CardError {}

impl From<SyntaxErrorInfo> for CardError {
    fn from(info: SyntaxErrorInfo) -> Self {
        Self::Syntax(info)
    }
}

#[cfg(test)]
mod tests {
    use gamma_compute::eval::Evaluator;
    use pretty_assertions::assert_eq;
    use super::*;

    fn long_trace(lines: usize) -> CardError {
        CardError::Internal {
            message: "boom".to_string(),
            trace: (0..lines).map(|i| format!("frame {}", i)).collect(),
        }
    }

    #[test]
    fn internal_traces_are_capped() {
        let text = long_trace(10).capped(2).card_text();
        assert!(text.starts_with("There was an error in Gamma.\nFor reference, the stack trace is:\n\n"), "{}", text);
        assert!(text.ends_with("frame 0\nframe 1"), "{}", text);
        assert_eq!(text.lines().count(), 3 + 2);
    }

    #[test]
    fn capping_leaves_other_errors_alone() {
        assert_eq!(CardError::value("nope").capped(0), CardError::value("nope"));
        assert_eq!(long_trace(1).capped(5), long_trace(1));
    }

    #[test]
    fn internal_from_evaluation_error() {
        let (err, _) = Evaluator::new().eval_value("xxxx").unwrap_err();
        match CardError::internal(&err, 2) {
            CardError::Internal { message, trace } => {
                assert_eq!(message, "name 'xxxx' is not defined");
                assert_eq!(trace.len(), 2);
                assert_eq!(trace[0], "Traceback (most recent call last):");
            },
            other => panic!("expected an internal error, got {:?}", other),
        }
    }
}
