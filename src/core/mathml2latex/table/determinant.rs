//! Determinants written as `| column-table column-table ... |`

use super::super::context::{ConvertContext, RaggedColumns};
use super::super::element::{Element, Tag};
use super::super::math::convert_element;
use super::super::utils::{environment, CELL_SEPARATOR, COMPACT_ROW_SEPARATOR};
use super::super::WarningKind;

/// Recognise and convert the determinant pattern on an `<mrow>`.
///
/// Returns `None` when the row does not have the shape, or when its column
/// tables differ in length and the options reject ragged columns.
pub fn convert_determinant(el: &Element, ctx: &mut ConvertContext) -> Option<String> {
    let columns = column_tables(el)?;

    let lengths: Vec<usize> = columns
        .iter()
        .map(|table| table.children_with_tag(Tag::Mtr).count())
        .collect();
    let height = lengths.iter().copied().max().unwrap_or(0);

    if lengths.iter().any(|&len| len != height) {
        let message = format!("determinant column tables have unequal lengths {:?}", lengths);
        tracing::warn!(lengths = ?lengths, "ragged determinant columns");
        ctx.warn(WarningKind::RaggedDeterminant, el, message);
        if ctx.options.ragged_columns == RaggedColumns::Reject {
            return None;
        }
    }

    let cells: Vec<Vec<String>> = columns
        .iter()
        .map(|table| {
            table
                .children_with_tag(Tag::Mtr)
                .map(|row| convert_element(row.find_child(Tag::Mrow).unwrap_or(row), ctx))
                .collect()
        })
        .collect();

    // Short columns are padded with empty cells
    let body = (0..height)
        .map(|i| {
            cells
                .iter()
                .map(|column| column.get(i).map(String::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join(CELL_SEPARATOR)
        })
        .collect::<Vec<_>>()
        .join(COMPACT_ROW_SEPARATOR);

    Some(format!("\\left|{}\\right|", environment("matrix", &body)))
}

/// The column tables between the two bars, if `el` has the determinant shape
fn column_tables(el: &Element) -> Option<&[Element]> {
    let n = el.children.len();
    if n < 4 || !el.children[0].is_operator("|") || !el.children[n - 1].is_operator("|") {
        return None;
    }
    let inner = &el.children[1..n - 1];
    inner
        .iter()
        .all(|child| child.tag == Tag::Mtable)
        .then_some(inner)
}
