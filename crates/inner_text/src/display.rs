//! Display classification
//!
//! Maps an element to its box `display` either through the injected
//! [`StyleResolver`] or through a static model of the browser default
//! stylesheet.

use crate::error::{InnerTextError, Result};
use crate::style::{ComputedStyle, StyleResolver};
use crate::tree::TreeNode;

/// Elements whose contents never contribute rendered text
pub const NON_RENDERED_TAGS: &[&str] = &[
    "audio", "input", "noscript", "script", "style", "textarea", "video",
];

/// Elements that are block-level in the default stylesheet
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "dialog",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "ul",
];

/// Elements treated as block-level no matter what the resolver reports
const FORCED_BLOCK_ELEMENTS: &[&str] = &["optgroup", "option"];

/// CSS `display` values the extractor distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Display {
    Block,
    FlowRoot,
    ListItem,
    Flex,
    Grid,
    Table,

    Inline,
    InlineBlock,
    RunIn,
    InlineListItem,
    InlineFlex,
    InlineGrid,
    Ruby,
    InlineTable,

    TableRowGroup,
    TableHeaderGroup,
    TableFooterGroup,
    TableRow,
    TableCell,
    TableColumnGroup,
    TableColumn,
    TableCaption,

    RubyBase,
    RubyText,
    RubyBaseContainer,
    RubyTextContainer,

    Contents,
    None,
    /// Anything else a resolver may report
    Unknown,
}

impl Display {
    /// Parse a computed `display` value, single or multi-keyword
    pub fn parse(value: &str) -> Self {
        let normalized = value
            .split_ascii_whitespace()
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "block" | "block flow" => Display::Block,
            "flow-root" | "block flow-root" => Display::FlowRoot,
            "list-item" | "block list-item" | "list-item block" | "block flow list-item" => {
                Display::ListItem
            }
            "flex" | "block flex" => Display::Flex,
            "grid" | "block grid" => Display::Grid,
            "table" | "block table" => Display::Table,

            "inline" | "inline flow" => Display::Inline,
            "inline-block" | "inline flow-root" => Display::InlineBlock,
            "run-in" | "run-in flow" => Display::RunIn,
            "inline list-item" | "inline-list-item" | "list-item inline"
            | "inline flow list-item" => Display::InlineListItem,
            "inline-flex" | "inline flex" => Display::InlineFlex,
            "inline-grid" | "inline grid" => Display::InlineGrid,
            "ruby" | "inline ruby" => Display::Ruby,
            "inline-table" | "inline table" => Display::InlineTable,

            "table-row-group" => Display::TableRowGroup,
            "table-header-group" => Display::TableHeaderGroup,
            "table-footer-group" => Display::TableFooterGroup,
            "table-row" => Display::TableRow,
            "table-cell" => Display::TableCell,
            "table-column-group" => Display::TableColumnGroup,
            "table-column" => Display::TableColumn,
            "table-caption" => Display::TableCaption,

            "ruby-base" => Display::RubyBase,
            "ruby-text" => Display::RubyText,
            "ruby-base-container" => Display::RubyBaseContainer,
            "ruby-text-container" => Display::RubyTextContainer,

            "contents" => Display::Contents,
            "none" => Display::None,
            _ => Display::Unknown,
        }
    }

    /// Canonical keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::FlowRoot => "flow-root",
            Display::ListItem => "list-item",
            Display::Flex => "flex",
            Display::Grid => "grid",
            Display::Table => "table",
            Display::Inline => "inline",
            Display::InlineBlock => "inline-block",
            Display::RunIn => "run-in",
            Display::InlineListItem => "inline list-item",
            Display::InlineFlex => "inline-flex",
            Display::InlineGrid => "inline-grid",
            Display::Ruby => "ruby",
            Display::InlineTable => "inline-table",
            Display::TableRowGroup => "table-row-group",
            Display::TableHeaderGroup => "table-header-group",
            Display::TableFooterGroup => "table-footer-group",
            Display::TableRow => "table-row",
            Display::TableCell => "table-cell",
            Display::TableColumnGroup => "table-column-group",
            Display::TableColumn => "table-column",
            Display::TableCaption => "table-caption",
            Display::RubyBase => "ruby-base",
            Display::RubyText => "ruby-text",
            Display::RubyBaseContainer => "ruby-base-container",
            Display::RubyTextContainer => "ruby-text-container",
            Display::Contents => "contents",
            Display::None => "none",
            Display::Unknown => "unknown",
        }
    }

    pub fn is_block_level(self) -> bool {
        matches!(
            self,
            Display::Block
                | Display::FlowRoot
                | Display::ListItem
                | Display::Flex
                | Display::Grid
                | Display::Table
        )
    }

    pub fn is_inline_level(self) -> bool {
        matches!(
            self,
            Display::Inline
                | Display::InlineBlock
                | Display::RunIn
                | Display::InlineListItem
                | Display::InlineFlex
                | Display::InlineGrid
                | Display::Ruby
                | Display::InlineTable
        )
    }

    pub fn is_table_row_group(self) -> bool {
        matches!(
            self,
            Display::TableRowGroup | Display::TableHeaderGroup | Display::TableFooterGroup
        )
    }
}

/// Default-stylesheet display for a lowercase tag name
pub fn default_display(local_name: &str) -> Display {
    if BLOCK_ELEMENTS.contains(&local_name) {
        return Display::Block;
    }

    match local_name {
        // https://drafts.csswg.org/css-tables-3/#mapping
        "table" => Display::Table,
        "thead" => Display::TableHeaderGroup,
        "tbody" => Display::TableRowGroup,
        "tfoot" => Display::TableFooterGroup,
        "tr" => Display::TableRow,
        "td" | "th" => Display::TableCell,
        "colgroup" => Display::TableColumnGroup,
        "col" => Display::TableColumn,
        "caption" => Display::TableCaption,

        // https://drafts.csswg.org/css-ruby-1/#default-ua-ruby
        "ruby" => Display::Ruby,
        "rp" => Display::None,
        "rbc" => Display::RubyBaseContainer,
        "rtc" => Display::RubyTextContainer,
        "rb" => Display::RubyBase,
        "rt" => Display::RubyText,

        _ => Display::Inline,
    }
}

/// Tags whose subtree is skipped entirely
pub fn is_non_rendered(local_name: &str) -> bool {
    NON_RENDERED_TAGS.contains(&local_name)
}

/// `optgroup` and `option` count as block-level regardless of style
pub fn is_forced_block<N: TreeNode>(element: &N) -> bool {
    element.is_element()
        && element
            .local_name()
            .is_some_and(|name| FORCED_BLOCK_ELEMENTS.contains(&name))
}

/// Answers display questions for elements, consulting the resolver when set
pub struct DisplayClassifier<'r, N> {
    resolver: Option<&'r dyn StyleResolver<N>>,
}

impl<'r, N: TreeNode> DisplayClassifier<'r, N> {
    pub fn new(resolver: Option<&'r dyn StyleResolver<N>>) -> Self {
        Self { resolver }
    }

    /// Classifier backed by the default stylesheet only
    pub fn default_stylesheet() -> Self {
        Self::new(None)
    }

    /// Effective display of `element`; non-elements report `Unknown`
    pub fn display(&self, element: &N) -> Result<Display> {
        if !element.is_element() {
            return Ok(Display::Unknown);
        }

        match self.resolver {
            Some(_) => Ok(self.resolve(element)?.display()),
            None => Ok(element
                .local_name()
                .map(default_display)
                .unwrap_or(Display::Inline)),
        }
    }

    pub fn is_block_level(&self, element: &N) -> Result<bool> {
        if is_forced_block(element) {
            return Ok(true);
        }
        Ok(self.display(element)?.is_block_level())
    }

    pub fn is_inline_level(&self, element: &N) -> Result<bool> {
        if is_forced_block(element) {
            return Ok(false);
        }
        Ok(self.display(element)?.is_inline_level())
    }

    /// Whether text directly inside `element` keeps its whitespace verbatim
    pub fn preserves_whitespace(&self, element: &N) -> Result<bool> {
        if !element.is_element() {
            return Ok(false);
        }

        match self.resolver {
            Some(_) => Ok(self.resolve(element)?.is_preformatted()),
            None => Ok(element.local_name() == Some("pre")),
        }
    }

    fn resolve(&self, element: &N) -> Result<ComputedStyle> {
        let Some(resolver) = self.resolver else {
            return Ok(ComputedStyle::default());
        };
        tracing::trace!("Resolving computed style for <{}>", element.local_name().unwrap_or(""));
        resolver
            .computed_style(element)
            .map_err(InnerTextError::StyleResolver)
    }
}
