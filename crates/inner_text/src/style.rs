//! Injected style resolution
//!
//! A resolver reports the effective `display` and `white-space` of an
//! element. When one is supplied its answers are authoritative and replace
//! the built-in default stylesheet.

use crate::display::Display;
use crate::error::BoxError;
use serde::{Deserialize, Serialize};

/// The two computed properties the extractor consults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub display: String,
    pub white_space: String,
}

impl ComputedStyle {
    pub fn new(display: &str, white_space: &str) -> Self {
        Self {
            display: display.to_string(),
            white_space: white_space.to_string(),
        }
    }

    /// Parsed `display` value
    pub fn display(&self) -> Display {
        Display::parse(&self.display)
    }

    /// `white-space: pre`
    pub fn is_preformatted(&self) -> bool {
        self.white_space.trim().eq_ignore_ascii_case("pre")
    }
}

impl Default for ComputedStyle {
    /// CSS initial values
    fn default() -> Self {
        Self::new("inline", "normal")
    }
}

/// Strategy reporting computed styles for elements of tree type `N`
pub trait StyleResolver<N> {
    fn computed_style(&self, element: &N) -> Result<ComputedStyle, BoxError>;
}

impl<N, F> StyleResolver<N> for F
where
    F: Fn(&N) -> Result<ComputedStyle, BoxError>,
{
    fn computed_style(&self, element: &N) -> Result<ComputedStyle, BoxError> {
        self(element)
    }
}
