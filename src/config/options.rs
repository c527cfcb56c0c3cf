#![forbid(unsafe_code)]

//! Rule option schemas and the configuration normalizer
//!
//! Rules accept their options in several historical shapes: a bare string,
//! an object of sub-options, an object keyed by construct name, or a
//! positional `[string, object]` pair. [`RawRuleConfig::classify`] sorts a
//! raw JSON value into exactly one of those shapes and [`normalize`] folds
//! it into a canonical [`RuleConfig`]: defaults first, then the general
//! setting, then per construct the construct's own setting, key by key.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Literal default value of an option field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Str(&'static str),
    /// Unset or unbounded; a field with this default also accepts `null`
    Null,
}

impl DefaultValue {
    pub fn to_json(self) -> Value {
        match self {
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::Int(n) => Value::from(n),
            DefaultValue::Str(s) => Value::String(s.to_string()),
            DefaultValue::Null => Value::Null,
        }
    }
}

/// Accepted type of an option field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Bool,
    Integer { min: i64 },
    Enum(&'static [&'static str]),
    /// Nested object; its fields are validated but not defaulted
    Object(&'static [FieldSpec]),
    OneOf(&'static [FieldKind]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: DefaultValue,
}

/// A named bundle of field values selectable by a bare string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub values: &'static [(&'static str, DefaultValue)],
}

/// How a bare string option is interpreted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shorthand {
    /// Bare strings are rejected
    None,
    /// The string is the value of the named field
    Field(&'static str),
    /// The string names a preset
    Presets(&'static [Preset]),
}

/// Declared option surface of one rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionsSchema {
    pub fields: &'static [FieldSpec],
    pub shorthand: Shorthand,
    /// Construct names that may carry their own settings
    pub constructs: &'static [&'static str],
}

impl OptionsSchema {
    /// Schema of a rule without options
    pub const EMPTY: OptionsSchema = OptionsSchema {
        fields: &[],
        shorthand: Shorthand::None,
        constructs: &[],
    };

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_construct(&self, name: &str) -> bool {
        self.constructs.contains(&name)
    }

    /// Every field at its default value
    pub fn defaults(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.default.to_json()))
            .collect()
    }
}

/// A setting for one construct, or the general setting
#[derive(Debug, Clone, PartialEq)]
pub enum RawSetting {
    Shorthand(String),
    Detailed(Map<String, Value>),
}

/// A raw rule option value, classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum RawRuleConfig {
    /// `"always"`
    Shorthand(String),
    /// `{ before = false, after = true }`
    Detailed(Map<String, Value>),
    /// `{ arrays = "always", generics = "never" }`
    PerConstruct(BTreeMap<String, RawSetting>),
    /// `["never", { generics = "always" }]`
    Positional(String, Box<RawRuleConfig>),
}

impl RawRuleConfig {
    /// Classifies a raw JSON value against a rule's schema
    ///
    /// `null` and `true` mean "enabled with defaults". Objects whose keys are
    /// all declared constructs are per-construct; objects mixing construct
    /// keys with other keys are rejected as ambiguous.
    pub fn classify(
        rule: &str,
        schema: &OptionsSchema,
        value: &Value,
    ) -> Result<RawRuleConfig, ConfigError> {
        match value {
            Value::Null | Value::Bool(true) => Ok(RawRuleConfig::Detailed(Map::new())),
            Value::String(s) => Ok(RawRuleConfig::Shorthand(s.clone())),
            Value::Object(map) => classify_object(rule, schema, map),
            Value::Array(items) => match items.as_slice() {
                [] => Ok(RawRuleConfig::Detailed(Map::new())),
                [Value::String(s)] => Ok(RawRuleConfig::Shorthand(s.clone())),
                [Value::Object(map)] => classify_object(rule, schema, map),
                [Value::String(s), Value::Object(map)] => Ok(RawRuleConfig::Positional(
                    s.clone(),
                    Box::new(classify_object(rule, schema, map)?),
                )),
                _ => Err(shape_error(
                    rule,
                    "expected [string], [object] or [string, object]",
                )),
            },
            Value::Bool(false) => Err(shape_error(
                rule,
                "`false` disables a rule and carries no options",
            )),
            Value::Number(_) => Err(shape_error(rule, "expected a string, object or array")),
        }
    }
}

fn shape_error(rule: &str, message: &str) -> ConfigError {
    ConfigError::InvalidShape {
        rule: rule.to_string(),
        message: message.to_string(),
    }
}

fn classify_object(
    rule: &str,
    schema: &OptionsSchema,
    map: &Map<String, Value>,
) -> Result<RawRuleConfig, ConfigError> {
    let construct_keys = map.keys().filter(|k| schema.has_construct(k)).count();

    if construct_keys == 0 {
        return Ok(RawRuleConfig::Detailed(map.clone()));
    }
    if construct_keys != map.len() {
        return Err(shape_error(
            rule,
            "object mixes construct names with option names",
        ));
    }

    let mut settings = BTreeMap::new();
    for (construct, value) in map {
        let setting = match value {
            Value::String(s) => RawSetting::Shorthand(s.clone()),
            Value::Object(inner) => RawSetting::Detailed(inner.clone()),
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: format!("{rule}.{construct}"),
                    message: "expected a string or an object".to_string(),
                });
            }
        };
        settings.insert(construct.clone(), setting);
    }
    Ok(RawRuleConfig::PerConstruct(settings))
}

/// Canonical, fully defaulted options of one rule
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    rule: String,
    general: Map<String, Value>,
    constructs: BTreeMap<String, Map<String, Value>>,
}

impl RuleConfig {
    /// Every option at its default
    pub fn defaults(rule: &str, schema: &OptionsSchema) -> RuleConfig {
        RuleConfig {
            rule: rule.to_string(),
            general: schema.defaults(),
            constructs: schema
                .constructs
                .iter()
                .map(|c| (c.to_string(), schema.defaults()))
                .collect(),
        }
    }

    /// Classifies and normalizes a raw value in one step
    pub fn from_value(
        rule: &str,
        schema: &OptionsSchema,
        value: &Value,
    ) -> Result<RuleConfig, ConfigError> {
        let raw = RawRuleConfig::classify(rule, schema, value)?;
        normalize(rule, schema, &raw)
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn general_map(&self) -> &Map<String, Value> {
        &self.general
    }

    /// Resolved options of `construct`; undeclared constructs resolve to the general options
    pub fn construct_map(&self, construct: &str) -> &Map<String, Value> {
        self.constructs.get(construct).unwrap_or(&self.general)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.general.get(key)
    }

    /// Deserializes the general options into a typed struct
    pub fn general<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        self.typed(None, &self.general)
    }

    /// Deserializes the options of one construct into a typed struct
    pub fn construct<T: DeserializeOwned>(&self, construct: &str) -> Result<T, ConfigError> {
        self.typed(Some(construct), self.construct_map(construct))
    }

    fn typed<T: DeserializeOwned>(
        &self,
        construct: Option<&str>,
        map: &Map<String, Value>,
    ) -> Result<T, ConfigError> {
        serde_json::from_value(Value::Object(map.clone())).map_err(|e| {
            let field = match construct {
                Some(c) => format!("{}.{}", self.rule, c),
                None => self.rule.clone(),
            };
            ConfigError::InvalidValue {
                field,
                message: e.to_string(),
            }
        })
    }
}

/// Folds a classified raw configuration into canonical form
///
/// Precedence, lowest to highest: schema defaults, the general setting,
/// the construct's own setting. Unset keys inherit from the level below.
pub fn normalize(
    rule: &str,
    schema: &OptionsSchema,
    raw: &RawRuleConfig,
) -> Result<RuleConfig, ConfigError> {
    let (general_setting, per_construct) = match raw {
        RawRuleConfig::Shorthand(s) => (expand_shorthand(rule, schema, s)?, None),
        RawRuleConfig::Detailed(map) => (validated(rule, schema, map)?, None),
        RawRuleConfig::PerConstruct(settings) => (Map::new(), Some(settings)),
        RawRuleConfig::Positional(s, rest) => {
            let mut general = expand_shorthand(rule, schema, s)?;
            match rest.as_ref() {
                RawRuleConfig::Detailed(map) => {
                    general.extend(validated(rule, schema, map)?);
                    (general, None)
                }
                RawRuleConfig::PerConstruct(settings) => (general, Some(settings)),
                _ => {
                    return Err(shape_error(
                        rule,
                        "second positional element must be an object",
                    ));
                }
            }
        }
    };

    let mut general = schema.defaults();
    general.extend(general_setting);

    let mut constructs = BTreeMap::new();
    for construct in schema.constructs {
        let mut resolved = general.clone();
        if let Some(setting) = per_construct.and_then(|s| s.get(*construct)) {
            let specific = match setting {
                RawSetting::Shorthand(s) => expand_shorthand(rule, schema, s)?,
                RawSetting::Detailed(map) => validated(rule, schema, map)?,
            };
            resolved.extend(specific);
        }
        constructs.insert(construct.to_string(), resolved);
    }

    tracing::trace!(rule, constructs = constructs.len(), "normalized rule options");

    Ok(RuleConfig {
        rule: rule.to_string(),
        general,
        constructs,
    })
}

fn expand_shorthand(
    rule: &str,
    schema: &OptionsSchema,
    value: &str,
) -> Result<Map<String, Value>, ConfigError> {
    match schema.shorthand {
        Shorthand::None => Err(shape_error(rule, "rule does not accept a string option")),
        Shorthand::Field(name) => {
            let mut map = Map::new();
            map.insert(name.to_string(), Value::String(value.to_string()));
            validated(rule, schema, &map)
        }
        Shorthand::Presets(presets) => presets
            .iter()
            .find(|p| p.name == value)
            .map(|p| {
                p.values
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect()
            })
            .ok_or_else(|| ConfigError::InvalidValue {
                field: rule.to_string(),
                message: format!(
                    "'{value}' is not one of {}",
                    presets
                        .iter()
                        .map(|p| format!("'{}'", p.name))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }),
    }
}

/// Checks every key of `map` against the schema's fields
fn validated(
    rule: &str,
    schema: &OptionsSchema,
    map: &Map<String, Value>,
) -> Result<Map<String, Value>, ConfigError> {
    for (key, value) in map {
        let field = schema.field(key).ok_or_else(|| ConfigError::UnknownOption {
            rule: rule.to_string(),
            option: key.clone(),
        })?;
        check_value(rule, &format!("{rule}.{key}"), field, value)?;
    }
    Ok(map.clone())
}

fn check_value(
    rule: &str,
    path: &str,
    field: &FieldSpec,
    value: &Value,
) -> Result<(), ConfigError> {
    if value.is_null() && field.default == DefaultValue::Null {
        return Ok(());
    }
    check_kind(rule, path, &field.kind, value)
}

fn check_kind(rule: &str, path: &str, kind: &FieldKind, value: &Value) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        field: path.to_string(),
        message,
    };

    match kind {
        FieldKind::Bool => value
            .is_boolean()
            .then_some(())
            .ok_or_else(|| invalid(format!("expected a boolean, found {value}"))),
        FieldKind::Integer { min } => match value.as_i64() {
            Some(n) if n >= *min => Ok(()),
            Some(n) => Err(invalid(format!("{n} is below the minimum of {min}"))),
            None => Err(invalid(format!("expected an integer, found {value}"))),
        },
        FieldKind::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => Ok(()),
            _ => Err(invalid(format!(
                "expected one of {}, found {value}",
                allowed
                    .iter()
                    .map(|a| format!("'{a}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        },
        FieldKind::Object(fields) => {
            let map = value
                .as_object()
                .ok_or_else(|| invalid(format!("expected an object, found {value}")))?;
            for (key, inner) in map {
                let spec = fields.iter().find(|f| f.name == key).ok_or_else(|| {
                    ConfigError::UnknownOption {
                        rule: rule.to_string(),
                        option: format!("{path}.{key}"),
                    }
                })?;
                check_value(rule, &format!("{path}.{key}"), spec, inner)?;
            }
            Ok(())
        }
        FieldKind::OneOf(kinds) => {
            if kinds
                .iter()
                .any(|k| check_kind(rule, path, k, value).is_ok())
            {
                Ok(())
            } else {
                Err(invalid(format!("{value} matches none of the accepted forms")))
            }
        }
    }
}
