//! Data layer - Static mappings
//!
//! Operator, glyph, entity and function-name tables shared by every
//! conversion.

pub mod maps;

pub use maps::{
    matrix_environment, CONTENT_OPERATORS, FUNCTION_NAMES, MATHML_ENTITIES, OPERATOR_GLYPHS,
};
