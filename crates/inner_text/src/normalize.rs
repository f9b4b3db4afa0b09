//! Sequence normalization
//!
//! Turns collected items into the final string. Break markers at either end
//! vanish; every run of consecutive markers becomes as many newlines as the
//! heaviest marker in the run, so adjacent boundaries collapse instead of
//! stacking.

use crate::collect::Item;

/// Render `items` into text
pub fn normalize(items: &[Item]) -> String {
    let mut out = String::new();
    let mut started = false;
    // (heaviest weight, marker count) of the run being accumulated
    let mut pending: Option<(u8, usize)> = None;

    for item in items {
        match item {
            Item::Text(text) if text.is_empty() => {}
            Item::Text(text) => {
                if let Some((weight, count)) = pending.take() {
                    if started {
                        if count > 1 {
                            tracing::trace!(
                                "Collapsed {} break markers into {} newline(s)",
                                count,
                                weight
                            );
                        }
                        out.extend(std::iter::repeat('\n').take(weight as usize));
                    }
                }
                out.push_str(text);
                started = true;
            }
            Item::Break(weight) => {
                pending = Some(match pending {
                    Some((heaviest, count)) => (heaviest.max(*weight), count + 1),
                    None => (*weight, 1),
                });
            }
        }
    }

    out
}
