use gamma_attrs::ErrorKind;

/// The input could not be turned into a token stream that any expression could be built from:
/// mismatched brackets, an operator with no left operand, an unterminated string, and the like.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid input: {}", self.reason),
    labels = ["here"],
    category = Syntax,
)]
pub struct TokenError {
    /// What is wrong with the input.
    pub reason: String,
}

impl TokenError {
    /// Creates a token error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}
