//! Field rules: the declarative constraint set for one attribute
//!
//! A [`FieldRule`] is pure configuration. Rules are built once when the
//! schema registry is constructed and never mutated afterwards.
//!
//! ```rust,ignore
//! let rule = FieldRule::required(ValueKind::String)
//!     .max_length(MAX_STRING_LENGTH)
//!     .pattern(phone_regex().clone());
//! ```

use crate::core::auth::Actor;
use crate::core::entity::Record;
use crate::core::store::RecordStore;
use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Inputs available to a conditional requiredness predicate
pub struct RequirednessContext<'a> {
    /// True only for creation requests
    pub is_new: bool,
    /// The whitelisted, normalized candidate payload
    pub payload: &'a Record,
    /// The requester
    pub actor: &'a Actor,
}

/// Whether an attribute must be present
#[derive(Clone, Copy)]
pub enum Requiredness {
    /// Fixed for every request
    Always(bool),

    /// Decided per request
    Conditional(fn(&RequirednessContext<'_>) -> bool),
}

impl Requiredness {
    pub fn resolve(&self, ctx: &RequirednessContext<'_>) -> bool {
        match self {
            Requiredness::Always(required) => *required,
            Requiredness::Conditional(predicate) => predicate(ctx),
        }
    }
}

impl fmt::Debug for Requiredness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requiredness::Always(required) => write!(f, "Always({})", required),
            Requiredness::Conditional(_) => f.write_str("Conditional"),
        }
    }
}

/// Runtime kind of a JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    /// A JSON object or array
    Object,
}

impl ValueKind {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::Number => value.is_number(),
            ValueKind::Boolean => value.is_boolean(),
            ValueKind::Object => value.is_object() || value.is_array(),
        }
    }
}

/// A named structural check, for values whose kind alone says too little
#[derive(Clone, Copy)]
pub struct Shape {
    pub name: &'static str,
    pub matches: fn(&Value) -> bool,
}

impl Shape {
    /// A string holding a hyphenated UUID
    pub const UUID: Shape = Shape {
        name: "uuid",
        matches: is_uuid,
    };
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({})", self.name)
    }
}

fn is_uuid(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok())
}

/// What a value must look like to pass the kind check
#[derive(Debug, Clone, Copy)]
pub enum KindCheck {
    Primitive(ValueKind),
    Shape(Shape),
}

impl KindCheck {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            KindCheck::Primitive(kind) => kind.matches(value),
            KindCheck::Shape(shape) => (shape.matches)(value),
        }
    }
}

impl From<ValueKind> for KindCheck {
    fn from(kind: ValueKind) -> Self {
        KindCheck::Primitive(kind)
    }
}

impl From<Shape> for KindCheck {
    fn from(shape: Shape) -> Self {
        KindCheck::Shape(shape)
    }
}

/// A regular expression plus the message reported when it fails
#[derive(Debug, Clone)]
pub struct Pattern {
    pub regex: Regex,
    pub message: Option<&'static str>,
}

/// Inputs handed to a custom check
///
/// The value has already passed the kind check; the payload is the
/// whitelisted, normalized candidate.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    pub attribute: &'a str,
    pub value: &'a Value,
    pub payload: &'a Record,
    /// The record being updated, `None` on create
    pub stored: Option<&'a Record>,
    pub store: &'a dyn RecordStore,
}

impl<'a> CheckContext<'a> {
    /// Another attribute of the candidate payload
    pub fn sibling(&self, field: &str) -> Option<&'a Value> {
        self.payload.get(field)
    }

    /// Another attribute of the candidate payload, if it is a number
    pub fn sibling_number(&self, field: &str) -> Option<f64> {
        self.payload.get(field).and_then(Value::as_f64)
    }
}

/// Domain rule evaluated after the declarative checks
///
/// Returns every message to report for the attribute; an empty list means
/// the value passed. Store failures are returned as `Err` and abort the
/// whole validation call.
#[async_trait]
pub trait CustomCheck: Send + Sync {
    async fn check(&self, ctx: CheckContext<'_>) -> Result<Vec<String>>;
}

/// The full constraint set for one attribute
#[derive(Clone)]
pub struct FieldRule {
    pub requiredness: Requiredness,
    pub kind: KindCheck,
    pub allowed_values: Option<&'static [&'static str]>,
    pub pattern: Option<Pattern>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub equal_to: Option<&'static str>,
    pub unique: bool,
    pub preserve_whitespace: bool,
    pub custom: Option<Arc<dyn CustomCheck>>,
}

impl FieldRule {
    pub fn new(requiredness: Requiredness, kind: impl Into<KindCheck>) -> Self {
        Self {
            requiredness,
            kind: kind.into(),
            allowed_values: None,
            pattern: None,
            min_length: None,
            max_length: None,
            equal_to: None,
            unique: false,
            preserve_whitespace: false,
            custom: None,
        }
    }

    /// Required on every request
    pub fn required(kind: impl Into<KindCheck>) -> Self {
        Self::new(Requiredness::Always(true), kind)
    }

    /// Never required; a value of the wrong kind is dropped from the payload
    pub fn optional(kind: impl Into<KindCheck>) -> Self {
        Self::new(Requiredness::Always(false), kind)
    }

    /// Required when `predicate` says so
    pub fn required_if(
        predicate: fn(&RequirednessContext<'_>) -> bool,
        kind: impl Into<KindCheck>,
    ) -> Self {
        Self::new(Requiredness::Conditional(predicate), kind)
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed_values = Some(values);
        self
    }

    pub fn pattern(mut self, regex: Regex) -> Self {
        self.pattern = Some(Pattern {
            regex,
            message: None,
        });
        self
    }

    pub fn pattern_with_message(mut self, regex: Regex, message: &'static str) -> Self {
        self.pattern = Some(Pattern {
            regex,
            message: Some(message),
        });
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Must match the value of another attribute
    pub fn equal_to(mut self, field: &'static str) -> Self {
        self.equal_to = Some(field);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Keep surrounding whitespace; only embedded newlines are stripped
    pub fn preserve_whitespace(mut self) -> Self {
        self.preserve_whitespace = true;
        self
    }

    pub fn check(mut self, check: impl CustomCheck + 'static) -> Self {
        self.custom = Some(Arc::new(check));
        self
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("requiredness", &self.requiredness)
            .field("kind", &self.kind)
            .field("allowed_values", &self.allowed_values)
            .field("pattern", &self.pattern.as_ref().map(|p| p.regex.as_str()))
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("equal_to", &self.equal_to)
            .field("unique", &self.unique)
            .field("preserve_whitespace", &self.preserve_whitespace)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}
