//! Host DOM tree
//!
//! Arena-backed DOM storage with read-only navigation handles.
//!
//! ## Core Design
//!
//! ```text
//! CDP JSON ─┐
//!           ├→ DomArena (owned) → NodeRef (Copy, borrowed) → consumers
//! NodeSpec ─┘        ↓
//!             NodeId (u32)
//! ```

pub mod arena;
pub mod builder;
pub mod error;
pub mod service;
pub mod types;

pub use arena::{DomArena, NodeRef};
pub use builder::NodeSpec;
pub use error::{DomError, Result};
pub use service::{DomService, DomServiceConfig};
pub use types::*;
