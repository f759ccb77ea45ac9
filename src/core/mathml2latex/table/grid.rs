//! Plain `<mtable>` layout

use super::super::context::ConvertContext;
use super::super::element::{Element, Tag};
use super::super::math::convert_element;
use super::super::utils::{environment, normalize_digits, CELL_SEPARATOR, COMPACT_ROW_SEPARATOR};

/// Markers that make a table read as a system of equations
const SYSTEM_MARKERS: [&str; 3] = ["=", "⇒", "\\Rightarrow"];

/// Convert an `<mtable>`.
///
/// Rows containing an equation or implication make the whole table a
/// `cases` environment; several plain rows make a `matrix`; a lone plain row
/// is returned unwrapped.
pub fn convert_mtable(el: &Element, ctx: &mut ConvertContext) -> String {
    let rows: Vec<&Element> = el.children_with_tag(Tag::Mtr).collect();
    if rows.is_empty() {
        let mut out = normalize_digits(el.trimmed_text()).into_owned();
        for child in &el.children {
            out.push_str(&convert_element(child, ctx));
        }
        return out;
    }

    let fragments: Vec<String> = rows.iter().map(|row| convert_row(row, ctx)).collect();
    if fragments.iter().all(String::is_empty) {
        return String::new();
    }

    if fragments.iter().any(|row| is_system_row(row)) {
        environment("cases", &fragments.join(COMPACT_ROW_SEPARATOR))
    } else if fragments.len() > 1 {
        environment("matrix", &fragments.join(COMPACT_ROW_SEPARATOR))
    } else {
        fragments.into_iter().next().unwrap_or_default()
    }
}

/// One table row: its cells joined by `&` when there are several, otherwise
/// the row's first nested `<mrow>` (or the row itself).
fn convert_row(row: &Element, ctx: &mut ConvertContext) -> String {
    let cells: Vec<&Element> = row.children_with_tag(Tag::Mtd).collect();
    if cells.len() > 1 {
        return cells
            .iter()
            .map(|cell| convert_element(cell, ctx))
            .collect::<Vec<_>>()
            .join(CELL_SEPARATOR);
    }

    let group = row.find_descendant(Tag::Mrow).unwrap_or(row);
    convert_element(group, ctx)
}

fn is_system_row(row: &str) -> bool {
    SYSTEM_MARKERS.iter().any(|marker| row.contains(marker))
}
