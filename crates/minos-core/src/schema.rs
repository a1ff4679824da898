//! Ordered field sets with aggregate validation.
//!
//! A [`FieldSet`] is the backbone of every request schema: an explicit,
//! ordered list of named [`Field`]s built at construction time. Fields
//! validate in declaration order, all errors are collected (never
//! first-wins), and the aggregate renders deterministically as
//! `"field: e1, e2; field2: e3."`.

use crate::field::Field;
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};

/// An ordered collection of named fields.
///
/// Each schema instance owns freshly constructed fields; nothing is
/// shared between requests. Unknown keys in the bound map are ignored,
/// missing keys leave the field absent.
///
/// # Example
///
/// ```rust
/// use minos_core::{Field, FieldKind, FieldSet};
/// use serde_json::{json, Map};
///
/// let mut fields = FieldSet::new();
/// fields.declare("login", Field::new(FieldKind::Char, true, true));
///
/// let mut body = Map::new();
/// body.insert("login".into(), json!("h&f"));
/// fields.bind(&body);
/// fields.validate();
/// assert!(fields.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    entries: Vec<(&'static str, Field)>,
}

impl FieldSet {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declares a named field. Declaration order is validation and
    /// error-reporting order.
    pub fn declare(&mut self, name: &'static str, field: Field) {
        self.entries.push((name, field));
    }

    /// Binds raw values from a JSON object onto the declared fields.
    pub fn bind(&mut self, raw: &Map<String, Value>) {
        for (name, field) in &mut self.entries {
            field.set_value(raw.get(*name).cloned());
        }
    }

    /// Validates every field against the current local date.
    pub fn validate(&mut self) {
        self.validate_at(Local::now().date_naive());
    }

    /// Validates every field with an explicit evaluation date.
    pub fn validate_at(&mut self, today: NaiveDate) {
        for (_, field) in &mut self.entries {
            field.validate_at(today);
        }
    }

    /// Returns `true` when the last validation produced no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, field)| field.errors().is_empty())
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.entries
            .iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, field)| field)
    }

    /// Returns the names of fields whose value is present.
    ///
    /// Presence is distinct from non-emptiness: a supplied `0` or `""`
    /// counts. Names come back alphabetically sorted so downstream
    /// diagnostics are deterministic.
    #[must_use]
    pub fn present_field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, field)| field.value().is_some())
            .map(|(name, _)| (*name).to_string())
            .collect();
        names.sort_unstable();
        names
    }

    /// Returns the validated values keyed by field name.
    ///
    /// Absent fields are omitted; cleaned rewrites (ISO dates, digit
    /// strings) are reflected.
    #[must_use]
    pub fn data(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .filter_map(|(name, field)| field.value().map(|v| ((*name).to_string(), v.clone())))
            .collect()
    }

    /// Renders all collected errors as one wire-compatible string.
    ///
    /// Fields join with `"; "`, errors within a field with `", "`, and
    /// the trailing period is always present — an error-free set renders
    /// as `"."`.
    #[must_use]
    pub fn render_errors(&self) -> String {
        let parts: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, field)| !field.errors().is_empty())
            .map(|(name, field)| format!("{}: {}", name, field.errors().join(", ")))
            .collect();
        format!("{}.", parts.join("; "))
    }
}
