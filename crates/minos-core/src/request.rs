//! Request schemas for the method envelope and the two API methods.
//!
//! Each request type declares its fields as an ordered descriptor list
//! at construction, binds the raw JSON map, and validates once. Every
//! request owns its own [`FieldSet`] — nothing is shared across
//! requests.

use crate::auth::ADMIN_LOGIN;
use crate::field::{Field, FieldKind};
use crate::schema::FieldSet;
use crate::scoring::ScoreQuery;
use chrono::{NaiveDate, Local};
use serde_json::{Map, Value};

/// Field pairs of which at least one must be fully present for an
/// online-score request: each pair is one complete contact/identity
/// facet.
pub const CONTACT_PAIRS: [(&str, &str); 3] = [
    ("first_name", "last_name"),
    ("phone", "email"),
    ("gender", "birthday"),
];

/// The outer method envelope: credentials, method name and arguments.
#[derive(Debug, Clone)]
pub struct MethodRequest {
    fields: FieldSet,
}

impl MethodRequest {
    /// Builds the envelope schema and binds the raw request body.
    #[must_use]
    pub fn new(body: &Map<String, Value>) -> Self {
        let mut fields = FieldSet::new();
        fields.declare("account", Field::new(FieldKind::Char, false, true));
        fields.declare("login", Field::new(FieldKind::Char, true, true));
        fields.declare("token", Field::new(FieldKind::Char, true, true));
        fields.declare("arguments", Field::new(FieldKind::Arguments, true, true));
        fields.declare("method", Field::new(FieldKind::Char, true, false));
        fields.bind(body);
        Self { fields }
    }

    /// Validates all envelope fields, returning overall validity.
    pub fn is_valid(&mut self) -> bool {
        self.fields.validate();
        self.fields.is_valid()
    }

    /// Renders the collected field errors as one string.
    #[must_use]
    pub fn render_errors(&self) -> String {
        self.fields.render_errors()
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.field(name).and_then(|f| f.value()).and_then(Value::as_str)
    }

    /// The optional account name.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.str_field("account")
    }

    /// The caller's login.
    #[must_use]
    pub fn login(&self) -> Option<&str> {
        self.str_field("login")
    }

    /// The supplied authentication token.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.str_field("token")
    }

    /// The requested method name.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.str_field("method")
    }

    /// The method arguments as a JSON object.
    ///
    /// An absent or empty-but-non-object arguments value dispatches as an
    /// empty map; the envelope validation has already rejected anything
    /// else.
    #[must_use]
    pub fn arguments(&self) -> Map<String, Value> {
        self.fields
            .field("arguments")
            .and_then(|f| f.value())
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the caller is the privileged admin login.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.login() == Some(ADMIN_LOGIN)
    }
}

/// Arguments of the `online_score` method.
///
/// All six attributes are individually optional; validity additionally
/// requires one of [`CONTACT_PAIRS`] to be fully present. After a
/// successful field pass the request records which fields were supplied
/// (`not_null_fields`) for the diagnostic context.
#[derive(Debug, Clone)]
pub struct OnlineScoreRequest {
    fields: FieldSet,
    not_null_fields: Vec<String>,
}

impl OnlineScoreRequest {
    /// Builds the score schema and binds the method arguments.
    #[must_use]
    pub fn new(arguments: &Map<String, Value>) -> Self {
        let mut fields = FieldSet::new();
        fields.declare("first_name", Field::new(FieldKind::Char, false, true));
        fields.declare("last_name", Field::new(FieldKind::Char, false, true));
        fields.declare("email", Field::new(FieldKind::Email, false, true));
        fields.declare("phone", Field::new(FieldKind::Phone, false, true));
        fields.declare("birthday", Field::new(FieldKind::BirthDay, false, true));
        fields.declare("gender", Field::new(FieldKind::Gender, false, true));
        fields.bind(arguments);
        Self {
            fields,
            not_null_fields: Vec::new(),
        }
    }

    /// Validates against the current local date.
    pub fn is_valid(&mut self) -> bool {
        self.is_valid_at(Local::now().date_naive())
    }

    /// Validates with an explicit evaluation date.
    ///
    /// Field errors short-circuit the pair rule; the pair rule itself
    /// fails without adding any error text, so [`Self::render_errors`]
    /// stays field-level.
    pub fn is_valid_at(&mut self, today: NaiveDate) -> bool {
        self.fields.validate_at(today);
        if !self.fields.is_valid() {
            return false;
        }
        self.not_null_fields = self.fields.present_field_names();
        CONTACT_PAIRS.iter().any(|(first, second)| {
            self.not_null_fields.iter().any(|name| name == first)
                && self.not_null_fields.iter().any(|name| name == second)
        })
    }

    /// Renders the collected field errors as one string.
    #[must_use]
    pub fn render_errors(&self) -> String {
        self.fields.render_errors()
    }

    /// Names of the supplied fields, recorded by the last successful
    /// field pass. Empty until field validation has passed.
    #[must_use]
    pub fn not_null_fields(&self) -> &[String] {
        &self.not_null_fields
    }

    /// Extracts the validated attributes for the scoring computation.
    ///
    /// Empty strings are dropped — a nullable blank scores no points.
    #[must_use]
    pub fn score_query(&self) -> ScoreQuery {
        let text = |name: &str| {
            self.fields
                .field(name)
                .and_then(|f| f.value())
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        ScoreQuery {
            first_name: text("first_name"),
            last_name: text("last_name"),
            email: text("email"),
            phone: text("phone"),
            birthday: text("birthday")
                .and_then(|iso| NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok()),
            gender: self
                .fields
                .field("gender")
                .and_then(|f| f.value())
                .and_then(Value::as_i64),
        }
    }
}

/// Arguments of the `clients_interests` method.
#[derive(Debug, Clone)]
pub struct ClientsInterestsRequest {
    fields: FieldSet,
}

impl ClientsInterestsRequest {
    /// Builds the interests schema and binds the method arguments.
    #[must_use]
    pub fn new(arguments: &Map<String, Value>) -> Self {
        let mut fields = FieldSet::new();
        fields.declare("client_ids", Field::new(FieldKind::ClientIds, true, false));
        fields.declare("date", Field::new(FieldKind::Date, false, true));
        fields.bind(arguments);
        Self { fields }
    }

    /// Validates all fields, returning overall validity.
    pub fn is_valid(&mut self) -> bool {
        self.fields.validate();
        self.fields.is_valid()
    }

    /// Renders the collected field errors as one string.
    #[must_use]
    pub fn render_errors(&self) -> String {
        self.fields.render_errors()
    }

    /// The validated client ids, in input order.
    #[must_use]
    pub fn client_ids(&self) -> Vec<i64> {
        self.fields
            .field("client_ids")
            .and_then(|f| f.value())
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default()
    }
}
