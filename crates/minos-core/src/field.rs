//! Self-validating request fields.
//!
//! A [`Field`] pairs a raw JSON value with a [`FieldKind`] and the
//! required/nullable constraint flags. Validation runs in three mutually
//! exclusive steps:
//!
//! 1. absent value — `is require` when the field is required;
//! 2. present but empty value — `is not nullable` unless the field is
//!    nullable;
//! 3. the kind-specific clean step, which checks type and format and may
//!    rewrite the value (dates are replaced by their ISO form, integer
//!    phones by their digit string).
//!
//! Emptiness deliberately excludes integers: `0` is a present value, so
//! `gender = 0` and `client_id = 0` validate. Error strings are
//! wire-visible and kept byte-exact for existing clients.
//!
//! # Example
//!
//! ```rust
//! use minos_core::{Field, FieldKind};
//! use serde_json::json;
//!
//! let mut field = Field::new(FieldKind::Phone, true, false);
//! field.set_value(Some(json!(79281234567_i64)));
//! field.validate();
//! assert!(field.errors().is_empty());
//! ```

use chrono::{Duration, Local, NaiveDate};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Error for a required field that was not supplied.
pub const REQUIRED_ERROR: &str = "is require";

/// Error for an empty value on a non-nullable field.
pub const NULLABLE_ERROR: &str = "is not nullable";

/// Error for a non-string value on a char field.
pub const CHAR_ERROR: &str = "Is not a string";

/// Error for a non-object value on an arguments field.
pub const ARGUMENTS_ERROR: &str = "Is not dict with arguments";

/// Error for a string without an `@` on an email field.
pub const EMAIL_ERROR: &str = "Is not email";

/// Error for a value that is not an 11-digit phone number starting with 7.
pub const PHONE_ERROR: &str = "Is not phone number";

/// Error for a value that does not parse as a `DD.MM.YYYY` date.
pub const DATE_ERROR: &str = "Is note date";

/// Error for a birthday more than 70 years in the past.
pub const BIRTHDAY_ERROR: &str = "Not a birthday";

/// Error for a gender value outside {0, 1, 2}.
pub const GENDER_ERROR: &str = "is not a gender number";

/// Error for a value that is not a list of integer client ids.
pub const CLIENT_IDS_ERROR: &str = "Is not list of client ids";

/// Number of days in the birthday acceptance window (70 years of 365 days).
const MAX_AGE_DAYS: i64 = 365 * 70;

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^7\d{10}$").expect("phone pattern is valid"))
}

fn date_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    // Day and month tolerate a single digit; the year must be four digits.
    SHAPE.get_or_init(|| Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}$").expect("date shape is valid"))
}

/// The set of field kinds understood by the validation layer.
///
/// Each kind supplies the clean step run after the required/nullable
/// checks pass. Kinds are data, not subclasses: a schema declares its
/// fields as `(name, kind, flags)` descriptors and owns fresh [`Field`]
/// instances per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON string.
    Char,
    /// A JSON object holding method arguments.
    Arguments,
    /// A string containing an `@`.
    Email,
    /// An 11-digit number starting with 7, given as a string or integer.
    Phone,
    /// A `DD.MM.YYYY` calendar date.
    Date,
    /// A [`FieldKind::Date`] no more than 70 years in the past.
    BirthDay,
    /// An integer in {0 unknown, 1 male, 2 female}.
    Gender,
    /// A list of integer client ids.
    ClientIds,
}

impl FieldKind {
    /// Runs the kind-specific clean step.
    ///
    /// `value` is the present, non-empty value to check; clean may rewrite
    /// it in place. Violations are appended to `errors`.
    fn clean(self, value: &mut Value, today: NaiveDate, errors: &mut Vec<String>) {
        match self {
            Self::Char => {
                if !value.is_string() {
                    errors.push(CHAR_ERROR.to_string());
                }
            }
            Self::Arguments => {
                if !value.is_object() {
                    errors.push(ARGUMENTS_ERROR.to_string());
                }
            }
            Self::Email => {
                if let Some(text) = value.as_str() {
                    if !text.contains('@') {
                        errors.push(EMAIL_ERROR.to_string());
                    }
                } else {
                    errors.push(CHAR_ERROR.to_string());
                }
            }
            Self::Phone => clean_phone(value, errors),
            Self::Date => {
                clean_date(value, errors);
            }
            Self::BirthDay => match clean_date(value, errors) {
                Some(date) if date < today - Duration::days(MAX_AGE_DAYS) => {
                    errors.push(BIRTHDAY_ERROR.to_string());
                }
                Some(_) => {}
                // An unparseable birthday collects the date error above
                // and the birthday error, like the layered date check.
                None => errors.push(BIRTHDAY_ERROR.to_string()),
            },
            Self::Gender => {
                if !matches!(value.as_i64(), Some(0..=2)) {
                    errors.push(GENDER_ERROR.to_string());
                }
            }
            Self::ClientIds => {
                let all_integers = value.as_array().is_some_and(|items| {
                    items
                        .iter()
                        .all(|item| item.as_i64().is_some() || item.as_u64().is_some())
                });
                if !all_integers {
                    errors.push(CLIENT_IDS_ERROR.to_string());
                }
            }
        }
    }
}

/// Coerces integers to their digit string and matches the phone pattern.
///
/// Floats fail outright: `7928426135.0` is not silently truncated.
fn clean_phone(value: &mut Value, errors: &mut Vec<String>) {
    let digits = match &*value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.is_i64() || number.is_u64() => Some(number.to_string()),
        _ => None,
    };
    match digits {
        Some(digits) if phone_pattern().is_match(&digits) => {
            *value = Value::String(digits);
        }
        _ => errors.push(PHONE_ERROR.to_string()),
    }
}

/// Parses a `DD.MM.YYYY` string and rewrites the value to ISO form.
///
/// Returns the parsed date so layered kinds can run further checks
/// without re-parsing. A failed parse appends [`DATE_ERROR`] and leaves
/// the value untouched.
fn clean_date(value: &mut Value, errors: &mut Vec<String>) -> Option<NaiveDate> {
    let parsed = value
        .as_str()
        .filter(|text| date_shape().is_match(text))
        .and_then(|text| NaiveDate::parse_from_str(text, "%d.%m.%Y").ok());
    match parsed {
        Some(date) => {
            *value = Value::String(date.format("%Y-%m-%d").to_string());
            Some(date)
        }
        None => {
            errors.push(DATE_ERROR.to_string());
            None
        }
    }
}

/// Returns whether a present value counts as empty.
///
/// Mirrors generic falsiness with one carve-out: numbers are only empty
/// when they are a floating zero, so integer `0` stays a present value.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(number) => {
            !number.is_i64() && !number.is_u64() && number.as_f64() == Some(0.0)
        }
        Value::Bool(_) | Value::Null => false,
    }
}

/// A single self-validating field.
///
/// Fields are owned by exactly one request; they carry the mutable raw
/// value and the error list produced by the last [`Field::validate`]
/// call. Validation is idempotent — errors are reset on every run.
#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    required: bool,
    nullable: bool,
    value: Option<Value>,
    errors: Vec<String>,
}

impl Field {
    /// Creates a field of the given kind with its constraint flags.
    #[must_use]
    pub fn new(kind: FieldKind, required: bool, nullable: bool) -> Self {
        Self {
            kind,
            required,
            nullable,
            value: None,
            errors: Vec::new(),
        }
    }

    /// Supplies the raw value for this field.
    ///
    /// A JSON `null` collapses to the absent sentinel: callers sending
    /// `"field": null` and callers omitting the key are validated alike.
    pub fn set_value(&mut self, value: Option<Value>) {
        self.value = value.filter(|v| !v.is_null());
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the current value, if one was supplied.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Returns the errors collected by the last validation run.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Validates against the current local date.
    pub fn validate(&mut self) {
        self.validate_at(Local::now().date_naive());
    }

    /// Validates with an explicit evaluation date.
    ///
    /// `today` anchors the birthday age check; everything else is
    /// date-independent. Errors from any previous run are discarded
    /// first, so repeated calls yield identical results.
    pub fn validate_at(&mut self, today: NaiveDate) {
        self.errors.clear();
        match &mut self.value {
            None => {
                if self.required {
                    self.errors.push(REQUIRED_ERROR.to_string());
                }
            }
            Some(value) if is_empty_value(value) => {
                if !self.nullable {
                    self.errors.push(NULLABLE_ERROR.to_string());
                }
            }
            Some(value) => self.kind.clean(value, today, &mut self.errors),
        }
    }
}
