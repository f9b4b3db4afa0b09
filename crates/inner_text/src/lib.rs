//! Rendered text extraction (`innerText`)
//!
//! Computes what a sighted reader would see as the text of a DOM subtree:
//! whitespace collapsed, line breaks at block boundaries, tabs between table
//! cells, newlines between table rows and at `<br>`.
//!
//! ## Core Design
//!
//! ```text
//! TreeNode ──→ Collector ──→ [Item] ──→ normalize ──→ String
//!                 ↑   ↑
//!   DisplayClassifier selected_children
//!         ↑
//!  StyleResolver (optional)
//! ```
//!
//! Collection emits weighted break markers instead of newlines. Only the
//! normalizer turns them into text, so a paragraph next to a block yields one
//! blank line, not two.
//!
//! ```
//! use dom::builder::{elem, text};
//! use inner_text::inner_text;
//!
//! let (arena, root) = elem("div", [elem("p", [text("hello")]), text("world")])
//!     .build()
//!     .unwrap();
//! let root = arena.node_ref(root).unwrap();
//! assert_eq!(inner_text(&root).unwrap(), "hello\n\nworld");
//! ```

pub mod children;
pub mod collect;
pub mod display;
pub mod dom_adapter;
pub mod error;
pub mod normalize;
pub mod options;
pub mod style;
pub mod tree;

pub use collect::{Collector, Item};
pub use display::{Display, DisplayClassifier};
pub use dom_adapter::{arena_inner_text, arena_inner_text_styled, StoredStyleResolver};
pub use error::{BoxError, InnerTextError, Result};
pub use normalize::normalize;
pub use options::InnerTextOptions;
pub use style::{ComputedStyle, StyleResolver};
pub use tree::{NodeKind, TreeNode};

/// Rendered text of `root` using the built-in default stylesheet
pub fn inner_text<N: TreeNode>(root: &N) -> Result<String> {
    inner_text_with(root, &InnerTextOptions::default())
}

/// Rendered text of `root` with explicit options
///
/// A non-rendered root (`script`, `style`, ...) returns its raw
/// `textContent` without running collection.
pub fn inner_text_with<N: TreeNode>(root: &N, options: &InnerTextOptions<'_, N>) -> Result<String> {
    if root.is_element() && root.local_name().is_some_and(display::is_non_rendered) {
        tracing::debug!(
            "Root <{}> is not rendered, returning textContent",
            root.local_name().unwrap_or_default()
        );
        return Ok(root.text_content());
    }

    let collector = Collector::new(DisplayClassifier::new(options.style_resolver));
    let items = collector.collect(root)?;
    Ok(normalize(&items))
}
