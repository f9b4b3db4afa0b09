//! Error types for text extraction
//!
//! The algorithm itself cannot fail. Errors only come from collaborators:
//! the injected style resolver or the host tree adapter.

use thiserror::Error;

/// Boxed error returned by style resolvers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, InnerTextError>;

#[derive(Debug, Error)]
pub enum InnerTextError {
    #[error("Style resolver failed: {0}")]
    StyleResolver(#[source] BoxError),

    #[error("DOM error: {0}")]
    Dom(#[from] dom::DomError),
}
