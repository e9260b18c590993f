//! The plain records returned to callers.

use gamma_parser::parser::error::SyntaxErrorInfo;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One entry of the list returned by
/// [`Gamma::classify_and_evaluate`](crate::Gamma::classify_and_evaluate).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum CardRecord {
    /// The input, or the result of a command, already rendered.
    Output {
        title: String,
        input: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
        output: Option<String>,
    },

    /// The request failed.
    Error {
        title: String,
        input: String,
        error: String,
    },

    /// The input is not a valid expression.
    SyntaxError {
        title: String,
        input: String,
        exception_info: SyntaxErrorInfo,
    },

    /// A card to evaluate, described but not yet evaluated. Its id is used with
    /// [`Gamma::evaluate_card`](crate::Gamma::evaluate_card).
    Card {
        card: String,
        var: String,
        title: String,
        input: Option<String>,
        pre_output: String,
        parameters: Vec<String>,
    },
}

impl CardRecord {
    /// The title of the record.
    pub fn title(&self) -> &str {
        match self {
            Self::Output { title, .. }
                | Self::Error { title, .. }
                | Self::SyntaxError { title, .. }
                | Self::Card { title, .. } => title.as_str(),
        }
    }

    /// The id of the card, if the record describes one.
    pub fn card_id(&self) -> Option<&str> {
        match self {
            Self::Card { card, .. } => Some(card.as_str()),
            _ => None,
        }
    }
}

/// The description of a single card, from [`Gamma::get_card_info`](crate::Gamma::get_card_info).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CardInfo {
    pub var: String,
    pub title: String,
    pub input: Option<String>,
    pub pre_output: String,
}

/// The result of a card, from [`Gamma::evaluate_card`](crate::Gamma::evaluate_card).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CardOutput {
    /// The representation of the result.
    pub value: String,

    /// The result rendered for display.
    pub output: String,
}
