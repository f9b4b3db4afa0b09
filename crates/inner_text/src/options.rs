//! Extraction options

use crate::style::StyleResolver;
use std::fmt;

/// Per-call configuration
///
/// Default: no style resolver, the built-in default stylesheet decides.
pub struct InnerTextOptions<'r, N> {
    pub style_resolver: Option<&'r dyn StyleResolver<N>>,
}

impl<'r, N> InnerTextOptions<'r, N> {
    pub fn new() -> Self {
        Self {
            style_resolver: None,
        }
    }

    /// Options deferring display and white-space decisions to `resolver`
    pub fn with_style_resolver(resolver: &'r dyn StyleResolver<N>) -> Self {
        Self {
            style_resolver: Some(resolver),
        }
    }
}

impl<N> Default for InnerTextOptions<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for InnerTextOptions<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for InnerTextOptions<'_, N> {}

impl<N> fmt::Debug for InnerTextOptions<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InnerTextOptions")
            .field("style_resolver", &self.style_resolver.is_some())
            .finish()
    }
}
