//! Table layouts for MathML to LaTeX conversion
//!
//! Three shapes are recognised:
//!
//! ```text
//! <mtable>                       -> cases / matrix / single row
//! <mrow> | <mtable>.. <mtable> | -> \left|\begin{matrix}..\end{matrix}\right|
//! <mfenced><mtable>              -> pmatrix / bmatrix / vmatrix / ...
//! ```
//!
//! Each layout reads rows and cells from the element tree directly instead of
//! composing the already converted child fragments.

mod determinant;
mod fenced;
mod grid;


pub use determinant::convert_determinant;
pub use fenced::convert_fenced_table;
pub use grid::convert_mtable;
