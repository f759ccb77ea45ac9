//! Tables wrapped in `<mfenced>`

use super::super::context::ConvertContext;
use super::super::element::{Element, Tag};
use super::super::math::{convert_element, fence_delimiters};
use super::super::utils::{environment, CELL_SEPARATOR, ROW_SEPARATOR};
use crate::data::maps::matrix_environment;

/// Convert an `<mfenced>` whose content is a table into a delimited matrix.
///
/// Returns `None` for fences that hold anything else.
pub fn convert_fenced_table(el: &Element, ctx: &mut ConvertContext) -> Option<String> {
    if !holds_table(el) {
        return None;
    }

    let (open, close) = fence_delimiters(el);
    let env = matrix_environment(open, close);

    let rows: Vec<String> = el
        .descendants(Tag::Mtr)
        .into_iter()
        .map(|row| {
            let mut cells = row.descendants(Tag::Mtd);
            if cells.is_empty() {
                cells = row.children.iter().collect();
            }
            cells
                .into_iter()
                .map(|cell| convert_element(cell, ctx))
                .collect::<Vec<_>>()
                .join(CELL_SEPARATOR)
        })
        .collect();

    Some(environment(env, &rows.join(ROW_SEPARATOR)))
}

/// First child is an `<mtable>`, bare or as the only child of an `<mrow>`.
fn holds_table(el: &Element) -> bool {
    match el.children.first() {
        Some(first) if first.tag == Tag::Mtable => true,
        Some(first) if first.tag == Tag::Mrow => {
            first.children.len() == 1 && first.children[0].tag == Tag::Mtable
        }
        _ => false,
    }
}
