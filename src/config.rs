//! Configuration file parsing, option schemas and normalization

pub mod options;
pub mod rule_set;
pub mod style_toml;

pub use options::{
    DefaultValue, FieldKind, FieldSpec, OptionsSchema, Preset, RawRuleConfig, RawSetting,
    RuleConfig, Shorthand, normalize,
};
pub use rule_set::RuleSet;
pub use style_toml::{Config, EngineConfig, RuleValue};
