//! Filter passes.
//!
//! Every pass is a pure transform over the working string. Their order is
//! fixed by [`crate::XssSanitizer`]; several passes decode content so that
//! the later, destructive ones see the real payload.

mod attributes;
mod elements;
mod entities;
mod invisible;
mod never_allowed;
mod tags;
mod words;

pub use attributes::remove_evil_attributes;
pub use elements::{sanitize_naughty_html, sanitize_scripts};
pub use entities::{convert_to_ascii, entity_decode, url_decode, validate_entities};
pub use invisible::remove_invisible_characters;
pub use never_allowed::never_allowed;
pub use tags::{AttributePair, attribute_pairs, filter_attributes, remove_disallowed_tags};
pub use words::{compact_exploded_words, convert_tabs, replace_php_tags};

use tracing::warn;

/// Outcome of a bounded fixed-point loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPoint {
    /// Last value produced
    pub value: String,
    /// Rounds executed, including the final no-progress round
    pub rounds: usize,
    /// Whether a round reported no progress before the cap
    pub converged: bool,
}

impl FixedPoint {
    /// Unwrap the value, warning when the cap cut the loop short.
    pub fn into_value(self, pass: &'static str) -> String {
        if !self.converged {
            warn!(
                pass,
                rounds = self.rounds,
                "Pass hit its iteration cap; keeping best-effort result"
            );
        }
        self.value
    }
}

/// Re-apply `step` until it reports no progress, at most `max_passes` times.
///
/// `step` returns `Some(next)` when it changed the input and `None` once
/// there is nothing left to do.
pub fn until_stable<F>(input: String, max_passes: usize, mut step: F) -> FixedPoint
where
    F: FnMut(&str) -> Option<String>,
{
    let mut value = input;
    let mut rounds = 0;

    while rounds < max_passes {
        rounds += 1;
        match step(&value) {
            Some(next) if next != value => value = next,
            _ => {
                return FixedPoint {
                    value,
                    rounds,
                    converged: true,
                };
            }
        }
    }

    FixedPoint {
        value,
        rounds,
        converged: false,
    }
}
