//! Tree collection
//!
//! Walks the tree in document order and produces a flat list of [`Item`]s:
//! text fragments plus weighted break markers. Markers are resolved into
//! newlines later by [`crate::normalize`], which is what allows adjacent
//! block boundaries to collapse to the largest requested gap.
//!
//! ```text
//! <div><p>a</p>b</div>  →  [Break(1), Break(2), "a", Break(2), "b", Break(1)]
//! ```

use crate::children::selected_children;
use crate::display::{is_forced_block, is_non_rendered, Display, DisplayClassifier};
use crate::error::Result;
use crate::tree::{NodeKind, TreeNode};

/// Weight of a plain block boundary
pub const BLOCK_BREAK: u8 = 1;

/// Weight of a paragraph boundary
pub const PARAGRAPH_BREAK: u8 = 2;

/// Unit of the intermediate sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// Text fragment, possibly empty
    Text(String),
    /// Pending line break request of the given weight
    Break(u8),
}

impl Item {
    pub fn text(text: impl Into<String>) -> Self {
        Item::Text(text.into())
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Item::Break(_))
    }
}

/// Whitespace that CSS collapses (NBSP is not part of it)
pub fn is_collapsible(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\u{000C}' | '\r')
}

/// Replace every run of collapsible whitespace with one space
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for ch in text.chars() {
        if is_collapsible(ch) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

impl Direction {
    fn step<N: TreeNode>(self, node: &N) -> Option<N> {
        match self {
            Direction::Backward => node.previous_sibling(),
            Direction::Forward => node.next_sibling(),
        }
    }

    /// Children ordered so the one nearest the search origin comes first
    fn nearest_first<N>(self, mut children: Vec<N>) -> Vec<N> {
        if self == Direction::Backward {
            children.reverse();
        }
        children
    }
}

/// Outcome of scanning one subtree for visual text
enum Scan {
    Found(String),
    /// Line boundary: block-level box or forced break
    Boundary,
    /// Nothing visible here, keep looking
    Exhausted,
}

/// Recursive item producer
pub struct Collector<'r, N> {
    classifier: DisplayClassifier<'r, N>,
}

/// State of one collection
struct Pass<N> {
    items: Vec<Item>,
    /// Tables being collected, innermost last, each with its last row
    tables: Vec<(N, Option<N>)>,
}

impl<'r, N: TreeNode> Collector<'r, N> {
    pub fn new(classifier: DisplayClassifier<'r, N>) -> Self {
        Self { classifier }
    }

    /// Items for `node` and its subtree, in document order
    pub fn collect(&self, node: &N) -> Result<Vec<Item>> {
        let mut pass = Pass {
            items: Vec::new(),
            tables: Vec::new(),
        };
        self.collect_into(node, &mut pass)?;
        Ok(pass.items)
    }

    fn collect_into(&self, node: &N, pass: &mut Pass<N>) -> Result<()> {
        match node.kind() {
            NodeKind::Text => self.collect_text(node, pass),
            NodeKind::Element => self.collect_element(node, pass),
            NodeKind::Other => self.collect_children(node, pass),
        }
    }

    fn collect_children(&self, node: &N, pass: &mut Pass<N>) -> Result<()> {
        for child in selected_children(node) {
            self.collect_into(&child, pass)?;
        }
        Ok(())
    }

    fn collect_element(&self, element: &N, pass: &mut Pass<N>) -> Result<()> {
        let name = element.local_name().unwrap_or_default();
        if is_non_rendered(name) {
            return Ok(());
        }

        match name {
            "br" => {
                self.collect_children(element, pass)?;
                pass.items.push(Item::text("\n"));
            }
            "p" => self.collect_wrapped(element, PARAGRAPH_BREAK, pass)?,
            _ => {
                let display = self.classifier.display(element)?;
                match display {
                    Display::TableCell => {
                        self.collect_children(element, pass)?;
                        if self.has_following_cell(element)? {
                            pass.items.push(Item::text("\t"));
                        }
                    }
                    Display::TableRow => {
                        self.collect_children(element, pass)?;
                        if self.has_following_row(element, pass)? {
                            pass.items.push(Item::text("\n"));
                        }
                    }
                    Display::TableCaption => self.collect_wrapped(element, BLOCK_BREAK, pass)?,
                    Display::Table => {
                        let last_row = self.table_rows(element)?.pop();
                        pass.tables.push((element.clone(), last_row));
                        let collected = self.collect_wrapped(element, BLOCK_BREAK, pass);
                        pass.tables.pop();
                        collected?
                    }
                    _ if is_forced_block(element) || display.is_block_level() => {
                        self.collect_wrapped(element, BLOCK_BREAK, pass)?
                    }
                    _ => self.collect_children(element, pass)?,
                }
            }
        }

        Ok(())
    }

    fn collect_wrapped(&self, element: &N, weight: u8, pass: &mut Pass<N>) -> Result<()> {
        pass.items.push(Item::Break(weight));
        self.collect_children(element, pass)?;
        pass.items.push(Item::Break(weight));
        Ok(())
    }

    fn collect_text(&self, node: &N, pass: &mut Pass<N>) -> Result<()> {
        let data = node.text().unwrap_or_default();

        if self.in_preformatted(node)? {
            pass.items.push(Item::text(data));
            return Ok(());
        }

        let collapsed = collapse_whitespace(data);
        let mut text = collapsed.as_str();

        if text.starts_with(' ') && self.trims_leading_space(node)? {
            text = &text[1..];
        }
        if text.ends_with(' ') && self.trims_trailing_space(node)? {
            text = &text[..text.len() - 1];
        }

        pass.items.push(Item::text(text));
        Ok(())
    }

    /// Parent element keeps whitespace verbatim
    fn in_preformatted(&self, node: &N) -> Result<bool> {
        match node.parent() {
            Some(parent) if parent.is_element() => self.classifier.preserves_whitespace(&parent),
            _ => Ok(false),
        }
    }

    /// Leading space survives only after visual text that does not already
    /// end in whitespace
    fn trims_leading_space(&self, node: &N) -> Result<bool> {
        Ok(match self.visual_text(node, Direction::Backward)? {
            Some(previous) => previous.chars().next_back().map_or(true, is_collapsible),
            None => true,
        })
    }

    /// Trailing space survives only when more visual text follows on the line
    fn trims_trailing_space(&self, node: &N) -> Result<bool> {
        if node
            .next_sibling()
            .is_some_and(|next| next.is_element_named("br"))
        {
            return Ok(true);
        }
        Ok(self.visual_text(node, Direction::Forward)?.is_none())
    }

    /// Nearest non-empty text in `direction` within the same line context
    ///
    /// Walks siblings, descending into inline-level elements, and climbs to
    /// the parent while the parent is itself inline-level.
    fn visual_text(&self, node: &N, direction: Direction) -> Result<Option<String>> {
        let mut current = node.clone();

        loop {
            let mut sibling = direction.step(&current);
            while let Some(candidate) = sibling {
                match self.scan(&candidate, direction)? {
                    Scan::Found(text) => return Ok(Some(text)),
                    Scan::Boundary => return Ok(None),
                    Scan::Exhausted => sibling = direction.step(&candidate),
                }
            }

            match current.parent() {
                Some(parent) if parent.is_element() && self.classifier.is_inline_level(&parent)? => {
                    current = parent
                }
                _ => return Ok(None),
            }
        }
    }

    fn scan(&self, node: &N, direction: Direction) -> Result<Scan> {
        match node.kind() {
            NodeKind::Text => {
                let data = node.text().unwrap_or_default();
                if data.is_empty() {
                    return Ok(Scan::Exhausted);
                }
                // Whitespace-only text ahead renders nothing unless it is preserved
                if direction == Direction::Forward
                    && data.chars().all(is_collapsible)
                    && !self.in_preformatted(node)?
                {
                    return Ok(Scan::Exhausted);
                }
                Ok(Scan::Found(data.to_string()))
            }
            NodeKind::Element => {
                let name = node.local_name().unwrap_or_default();
                if name == "br" {
                    return Ok(Scan::Boundary);
                }
                if is_non_rendered(name) {
                    return Ok(Scan::Exhausted);
                }
                if !self.classifier.is_inline_level(node)? {
                    return Ok(Scan::Boundary);
                }
                for child in direction.nearest_first(selected_children(node)) {
                    match self.scan(&child, direction)? {
                        Scan::Exhausted => continue,
                        found_or_boundary => return Ok(found_or_boundary),
                    }
                }
                Ok(Scan::Exhausted)
            }
            NodeKind::Other => Ok(Scan::Exhausted),
        }
    }

    /// A later sibling cell exists in the same table row
    fn has_following_cell(&self, cell: &N) -> Result<bool> {
        let Some(row) = cell.parent() else {
            return Ok(false);
        };
        if self.classifier.display(&row)? != Display::TableRow {
            return Ok(false);
        }

        let mut sibling = cell.next_sibling();
        while let Some(candidate) = sibling {
            if self.classifier.display(&candidate)? == Display::TableCell {
                return Ok(true);
            }
            sibling = candidate.next_sibling();
        }
        Ok(false)
    }

    /// A later row exists in the nearest enclosing table
    ///
    /// The last row of each table is looked up once per pass.
    fn has_following_row(&self, row: &N, pass: &mut Pass<N>) -> Result<bool> {
        let Some(table) = self.nearest_table(row)? else {
            return Ok(false);
        };

        let cached = pass
            .tables
            .iter()
            .rev()
            .find(|(candidate, _)| *candidate == table)
            .map(|(_, last_row)| last_row.clone());
        let last_row = match cached {
            Some(last_row) => last_row,
            None => {
                // Not entered during this pass, e.g. it encloses the root
                let last_row = self.table_rows(&table)?.pop();
                pass.tables.insert(0, (table, last_row.clone()));
                last_row
            }
        };

        Ok(last_row.is_some_and(|last| last != *row))
    }

    fn nearest_table(&self, node: &N) -> Result<Option<N>> {
        let mut ancestor = node.parent();
        while let Some(candidate) = ancestor {
            if self.classifier.display(&candidate)? == Display::Table {
                return Ok(Some(candidate));
            }
            ancestor = candidate.parent();
        }
        Ok(None)
    }

    /// Rows of `table` in `HTMLTableElement.rows` order: header groups,
    /// then bodies and bare rows in tree order, then footer groups
    pub fn table_rows(&self, table: &N) -> Result<Vec<N>> {
        let mut head = Vec::new();
        let mut body = Vec::new();
        let mut foot = Vec::new();

        for child in table.children() {
            let display = self.classifier.display(&child)?;
            if display == Display::TableRow {
                body.push(child);
            } else if display.is_table_row_group() {
                let rows = self.group_rows(&child)?;
                match display {
                    Display::TableHeaderGroup => head.extend(rows),
                    Display::TableFooterGroup => foot.extend(rows),
                    _ => body.extend(rows),
                }
            }
        }

        head.extend(body);
        head.extend(foot);
        Ok(head)
    }

    fn group_rows(&self, group: &N) -> Result<Vec<N>> {
        let mut rows = Vec::new();
        for child in group.children() {
            if self.classifier.display(&child)? == Display::TableRow {
                rows.push(child);
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use dom::builder::{elem, text};
    use dom::NodeSpec;

    fn items_of(spec: NodeSpec) -> Vec<Item> {
        let (arena, root) = spec.build().unwrap();
        let root = arena.node_ref(root).unwrap();
        Collector::new(DisplayClassifier::default_stylesheet())
            .collect(&root)
            .unwrap()
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), " a b ");
        assert_eq!(collapse_whitespace("a\u{00A0}\u{00A0}b"), "a\u{00A0}\u{00A0}b");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_paragraph_inside_block() {
        let items = items_of(elem("div", [elem("p", [text("hi")])]));
        assert_eq!(
            items,
            vec![
                Item::Break(1),
                Item::Break(2),
                Item::text("hi"),
                Item::Break(2),
                Item::Break(1),
            ]
        );
    }

    #[test]
    fn test_br_is_literal_newline() {
        let items = items_of(elem("span", [text("a"), elem("br", []), text("b")]));
        assert_eq!(items, vec![Item::text("a"), Item::text("\n"), Item::text("b")]);
    }

    #[test]
    fn test_non_rendered_child_produces_nothing() {
        let items = items_of(elem(
            "span",
            [elem("script", [text("var x;")]), elem("style", [text("p {}")])],
        ));
        assert!(items.is_empty());
    }

    #[test]
    fn test_table_separators() {
        let items = items_of(elem(
            "table",
            [
                elem("tr", [elem("td", [text("1")]), elem("td", [text("2")])]),
                elem("tr", [elem("td", [text("3")])]),
            ],
        ));
        assert_eq!(
            items,
            vec![
                Item::Break(1),
                Item::text("1"),
                Item::text("\t"),
                Item::text("2"),
                Item::text("\n"),
                Item::text("3"),
                Item::Break(1),
            ]
        );
    }

    #[test]
    fn test_table_rows_order() {
        let (arena, root) = elem(
            "table",
            [
                elem("tfoot", [elem("tr", []).attr("id", "foot")]),
                elem("tbody", [elem("tr", []).attr("id", "body")]),
                elem("thead", [elem("tr", []).attr("id", "head")]),
                elem("tr", []).attr("id", "bare"),
            ],
        )
        .build()
        .unwrap();
        let collector = Collector::new(DisplayClassifier::default_stylesheet());
        let rows = collector.table_rows(&arena.node_ref(root).unwrap()).unwrap();
        let ids: Vec<_> = rows.iter().map(|row| row.node().attr("id").unwrap()).collect();
        assert_eq!(ids, vec!["head", "body", "bare", "foot"]);
    }

    #[test]
    fn test_nested_table_keeps_outer_rows() {
        let items = items_of(elem(
            "table",
            [
                elem(
                    "tr",
                    [
                        elem(
                            "td",
                            [
                                text("a"),
                                elem(
                                    "table",
                                    [
                                        elem("tr", [elem("td", [text("x")])]),
                                        elem("tr", [elem("td", [text("y")])]),
                                    ],
                                ),
                            ],
                        ),
                        elem("td", [text("b")]),
                    ],
                ),
                elem("tr", [elem("td", [text("c")])]),
            ],
        ));
        assert_eq!(normalize(&items), "a\nx\ny\n\tb\nc");
    }

    #[test]
    fn test_rows_of_table_above_root() {
        let (arena, root) = elem(
            "table",
            [elem(
                "tbody",
                [
                    elem("tr", [elem("td", [text("1")])]),
                    elem("tr", [elem("td", [text("2")])]),
                ],
            )],
        )
        .build()
        .unwrap();
        let root = arena.node_ref(root).unwrap();
        let tbody = root.children().next().unwrap();

        let items = Collector::new(DisplayClassifier::default_stylesheet())
            .collect(&tbody)
            .unwrap();
        assert_eq!(items, vec![Item::text("1"), Item::text("\n"), Item::text("2")]);
    }

    #[test]
    fn test_whitespace_between_blocks_is_dropped() {
        let items = items_of(elem(
            "div",
            [text("\n  "), elem("div", [text("a")]), text("\n  ")],
        ));
        assert_eq!(
            items,
            vec![
                Item::Break(1),
                Item::text(""),
                Item::Break(1),
                Item::text("a"),
                Item::Break(1),
                Item::text(""),
                Item::Break(1),
            ]
        );
    }

    #[test]
    fn test_space_kept_between_inline_siblings() {
        let items = items_of(elem(
            "div",
            [elem("span", [text("a")]), text(" "), elem("span", [text("b")])],
        ));
        assert!(items.contains(&Item::text(" ")));
    }
}
