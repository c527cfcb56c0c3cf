#![forbid(unsafe_code)]

//! Built-in rule catalog
//!
//! Every rule compiled into the crate is listed here once. The registry
//! registers them through [`builtin_rules`]; adding a rule means adding a
//! constructor to [`BUILTIN_RULES`].

use crate::rules::Rule;
use crate::rules::style::{
    CommaDangle, CommaSpacing, EolLast, JsxMaxPropsPerLine, NoExtraSemi, ObjectCurlyNewline,
    OneVarDeclarationPerLine, RestSpreadSpacing, SpaceBeforeBlocks,
};

type RuleConstructor = fn() -> Box<dyn Rule>;

/// Constructors of all built-in rules
const BUILTIN_RULES: &[RuleConstructor] = &[
    boxed::<CommaDangle>,
    boxed::<CommaSpacing>,
    boxed::<EolLast>,
    boxed::<JsxMaxPropsPerLine>,
    boxed::<NoExtraSemi>,
    boxed::<ObjectCurlyNewline>,
    boxed::<OneVarDeclarationPerLine>,
    boxed::<RestSpreadSpacing>,
    boxed::<SpaceBeforeBlocks>,
];

fn boxed<R: Rule + Default + 'static>() -> Box<dyn Rule> {
    Box::new(R::default())
}

/// Instantiate every built-in rule
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    BUILTIN_RULES.iter().map(|make| make()).collect()
}
