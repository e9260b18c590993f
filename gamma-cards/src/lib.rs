//! Classifies Gamma input and builds the result cards shown for it.
//!
//! A request goes through these steps:
//!
//! 1. The input is transformed into canonical source and evaluated (see `gamma-parser` and
//!    `gamma-compute`).
//! 2. The top-level call of the source is extracted into [`Arguments`].
//! 3. The [`classify`] module picks the cards that apply, from the called function and the shape
//!    of the evaluated value, and extracts the [`Components`] the cards work with.
//! 4. Each card from the [`registry`] describes itself, and can later be evaluated on its own.
//!
//! [`Gamma`] runs these steps and returns plain [`CardRecord`]s:
//!
//! ```
//! use gamma_cards::{CardRecord, Gamma};
//!
//! let gamma = Gamma::default();
//! let records = gamma.classify_and_evaluate("diff(x**2, x)");
//! let cards = records.iter().filter_map(CardRecord::card_id).collect::<Vec<_>>();
//! assert_eq!(cards, vec!["diff", "diffsteps", "integral_alternate"]);
//!
//! let output = gamma.evaluate_card("diff", "diff(x**2, x)", "x", &Default::default()).unwrap();
//! assert_eq!(output.value, "2*x");
//! ```

pub mod arguments;
pub mod card;
pub mod classify;
pub mod config;
pub mod error;
pub mod format;
mod gamma;
pub mod latex;
pub mod record;
pub mod registry;

pub use arguments::Arguments;
pub use card::{Card, CardResult, Parameters};
pub use classify::Components;
pub use config::{Config, ConfigBuilder};
pub use error::CardError;
pub use gamma::Gamma;
pub use record::{CardInfo, CardOutput, CardRecord};
