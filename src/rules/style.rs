//! Built-in style rules
//!
//! Each rule lives in its own file and follows the same pattern: a unit
//! struct implementing [`Rule`](crate::rules::Rule), a typed options
//! struct deserialized from the canonical configuration, and a checker
//! holding those options.

mod comma_dangle;
mod comma_spacing;
mod eol_last;
mod jsx_max_props_per_line;
mod no_extra_semi;
mod object_curly_newline;
mod one_var_declaration_per_line;
mod rest_spread_spacing;
mod space_before_blocks;

pub use comma_dangle::CommaDangle;
pub use comma_spacing::CommaSpacing;
pub use eol_last::EolLast;
pub use jsx_max_props_per_line::JsxMaxPropsPerLine;
pub use no_extra_semi::NoExtraSemi;
pub use object_curly_newline::ObjectCurlyNewline;
pub use one_var_declaration_per_line::OneVarDeclarationPerLine;
pub use rest_spread_spacing::RestSpreadSpacing;
pub use space_before_blocks::SpaceBeforeBlocks;
