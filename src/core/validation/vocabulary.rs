//! Shared rule vocabulary
//!
//! Constants, regular expressions, requiredness predicates, and the custom
//! checks reused across entity schemas.

use super::rule::{CheckContext, CustomCheck, RequirednessContext};
use crate::core::entity::EntityType;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Upper bound for short text columns
pub const MAX_STRING_LENGTH: usize = 255;
/// Upper bound for free-text columns
pub const MAX_TEXT_LENGTH: usize = 10_000;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 100;

pub const IS_INVALID: &str = "is invalid";

/// Email addresses, with quoted local parts and bracketed IPv4 domains
pub fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
        )
        .expect("email pattern compiles")
    })
}

/// Digits and spaces, with an optional leading `+`
pub fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[0-9\s]+$").expect("phone pattern compiles"))
}

/// Requiredness predicate: required on create only
pub fn on_create(ctx: &RequirednessContext<'_>) -> bool {
    ctx.is_new
}

/// Parse a date or timestamp
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, and RFC 3339. Timestamps
/// with an offset are converted to UTC.
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|datetime| datetime.with_timezone(&Utc).naive_utc())
}

// =============================================================================
// Custom checks
// =============================================================================

/// Run `first`, and `second` only when `first` reported nothing
pub struct Then<A, B> {
    first: A,
    second: B,
}

/// Chain custom checks so only the first failing one reports
pub trait CustomCheckExt: CustomCheck + Sized {
    fn then<B: CustomCheck>(self, second: B) -> Then<Self, B> {
        Then {
            first: self,
            second,
        }
    }
}

impl<T: CustomCheck + Sized> CustomCheckExt for T {}

#[async_trait]
impl<A: CustomCheck, B: CustomCheck> CustomCheck for Then<A, B> {
    async fn check(&self, ctx: CheckContext<'_>) -> Result<Vec<String>> {
        let messages = self.first.check(ctx).await?;
        if !messages.is_empty() {
            return Ok(messages);
        }
        self.second.check(ctx).await
    }
}

/// The value must parse as a date
pub struct ValidDate;

#[async_trait]
impl CustomCheck for ValidDate {
    async fn check(&self, ctx: CheckContext<'_>) -> Result<Vec<String>> {
        Ok(match parse_date(ctx.value) {
            Some(_) => vec![],
            None => vec![IS_INVALID.to_string()],
        })
    }
}

/// The value must parse as a date that is not in the future
pub struct PastDate;

#[async_trait]
impl CustomCheck for PastDate {
    async fn check(&self, ctx: CheckContext<'_>) -> Result<Vec<String>> {
        Ok(match parse_date(ctx.value) {
            None => vec![IS_INVALID.to_string()],
            Some(date) if date > Utc::now().naive_utc() => {
                vec!["can't be in the future".to_string()]
            }
            Some(_) => vec![],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    AtMost,
    AtLeast,
}

/// The value must be a date on the right side of a sibling date
///
/// An unparseable sibling is not compared; its own rule reports it.
pub struct DateOrder {
    sibling: &'static str,
    bound: Bound,
    message: &'static str,
}

impl DateOrder {
    /// Value must not come after the sibling date
    pub fn not_after(sibling: &'static str, message: &'static str) -> Self {
        Self {
            sibling,
            bound: Bound::AtMost,
            message,
        }
    }

    /// Value must not come before the sibling date
    pub fn not_before(sibling: &'static str, message: &'static str) -> Self {
        Self {
            sibling,
            bound: Bound::AtLeast,
            message,
        }
    }
}

#[async_trait]
impl CustomCheck for DateOrder {
    async fn check(&self, ctx: CheckContext<'_>) -> Result<Vec<String>> {
        let Some(date) = parse_date(ctx.value) else {
            return Ok(vec![IS_INVALID.to_string()]);
        };
        let Some(other) = ctx.sibling(self.sibling).and_then(parse_date) else {
            return Ok(vec![]);
        };

        let out_of_order = match self.bound {
            Bound::AtMost => date > other,
            Bound::AtLeast => date < other,
        };
        Ok(if out_of_order {
            vec![self.message.to_string()]
        } else {
            vec![]
        })
    }
}

/// The value must be the id of an existing record
pub struct References(pub EntityType);

#[async_trait]
impl CustomCheck for References {
    async fn check(&self, ctx: CheckContext<'_>) -> Result<Vec<String>> {
        let Some(id) = ctx.value.as_str() else {
            return Ok(vec![IS_INVALID.to_string()]);
        };
        Ok(match ctx.store.find_by_id(self.0, id).await? {
            Some(_) => vec![],
            None => vec![IS_INVALID.to_string()],
        })
    }
}

/// The value must not be negative
pub struct NonNegative(pub &'static str);

#[async_trait]
impl CustomCheck for NonNegative {
    async fn check(&self, ctx: CheckContext<'_>) -> Result<Vec<String>> {
        Ok(match ctx.value.as_f64() {
            Some(n) if n < 0.0 => vec![self.0.to_string()],
            _ => vec![],
        })
    }
}

/// The value must stay on one side of a sibling number
///
/// Skipped when the sibling is not a number.
pub struct BoundedBy {
    sibling: &'static str,
    bound: Bound,
    message: &'static str,
}

impl BoundedBy {
    /// Value must be at most the sibling
    pub fn at_most(sibling: &'static str, message: &'static str) -> Self {
        Self {
            sibling,
            bound: Bound::AtMost,
            message,
        }
    }

    /// Value must be at least the sibling
    pub fn at_least(sibling: &'static str, message: &'static str) -> Self {
        Self {
            sibling,
            bound: Bound::AtLeast,
            message,
        }
    }
}

#[async_trait]
impl CustomCheck for BoundedBy {
    async fn check(&self, ctx: CheckContext<'_>) -> Result<Vec<String>> {
        let (Some(value), Some(other)) = (ctx.value.as_f64(), ctx.sibling_number(self.sibling))
        else {
            return Ok(vec![]);
        };

        let violated = match self.bound {
            Bound::AtMost => value > other,
            Bound::AtLeast => value < other,
        };
        Ok(if violated {
            vec![self.message.to_string()]
        } else {
            vec![]
        })
    }
}

/// The value must reference an existing Position whose pay band covers
/// both the hourly and the overtime rate of the payload
///
/// The band is only compared when both rates are numbers.
pub struct PayBand {
    pub hourly: &'static str,
    pub overtime: &'static str,
}

#[async_trait]
impl CustomCheck for PayBand {
    async fn check(&self, ctx: CheckContext<'_>) -> Result<Vec<String>> {
        let position = match ctx.value.as_str() {
            Some(id) => ctx.store.find_by_id(EntityType::Position, id).await?,
            None => None,
        };
        let Some(position) = position else {
            return Ok(vec![IS_INVALID.to_string()]);
        };

        let (Some(hourly), Some(overtime)) = (
            ctx.sibling_number(self.hourly),
            ctx.sibling_number(self.overtime),
        ) else {
            return Ok(vec![]);
        };

        let maximum = position.get("maximum_pay").and_then(Value::as_f64);
        let minimum = position.get("minimum_pay").and_then(Value::as_f64);

        let mut messages = Vec::new();
        for (rate, label) in [(hourly, "hourly rate"), (overtime, "overtime rate")] {
            if maximum.is_some_and(|max| max < rate) {
                messages.push(format!(
                    "has a lower maximum pay than the specified {}",
                    label
                ));
            }
            if minimum.is_some_and(|min| min > rate) {
                messages.push(format!(
                    "has a higher minimum pay than the specified {}",
                    label
                ));
            }
        }
        Ok(messages)
    }
}
