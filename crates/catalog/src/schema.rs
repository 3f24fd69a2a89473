//! Declarative movie schema and the validator that interprets it.
//!
//! The shape of a valid movie is described once, as a table of
//! [`FieldRule`]s in [`MOVIE_SCHEMA`]. A single generic routine,
//! [`Schema::validate`], walks that table for both full and partial input;
//! the only difference between the two is the [`Mode`], which decides what
//! happens when a field is missing.
//!
//! ## Example
//! ```ignore
//! use catalog::schema::{validate_full, validate_partial};
//! use serde_json::json;
//!
//! let movie = validate_full(&json!({ "title": "Alien", /* ... */ }))?;
//! let patch = validate_partial(&json!({ "rate": 9 }))?;
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use url::Url;

use crate::types::{Genre, MoviePatch, NewMovie};

// =============================================================================
// Validation errors
// =============================================================================

/// Machine-readable category of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    Required,
    InvalidType,
    TooSmall,
    TooBig,
    InvalidString,
    InvalidEnumValue,
}

/// One failed constraint on one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Field name; array entries are addressed as `genre[1]`. Empty for the
    /// input as a whole.
    pub path: String,
    pub code: IssueCode,
    pub message: String,
}

impl Issue {
    fn new(path: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }
}

/// Every issue found in one input. Never empty.
///
/// Serializes as a bare array of issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Paths of every failing field, in schema order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|issue| issue.path.as_str())
    }

    /// Whether any issue concerns `field` or one of its entries
    pub fn concerns(&self, field: &str) -> bool {
        self.paths()
            .any(|path| path == field || path.strip_prefix(field).is_some_and(|rest| rest.starts_with('[')))
    }

    fn single(issue: Issue) -> Self {
        Self { issues: vec![issue] }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            if issue.path.is_empty() {
                f.write_str(&issue.message)?;
            } else {
                write!(f, "{}: {}", issue.path, issue.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// =============================================================================
// Schema description
// =============================================================================

/// Whether a missing field is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every field must be present (or have a default)
    Full,
    /// Missing fields are skipped; present fields are still checked
    Partial,
}

/// What to do when a field is absent under [`Mode::Full`]
#[derive(Debug, Clone, Copy)]
pub enum Presence {
    Required,
    /// Fill the field with the produced value
    Defaulted(fn() -> Value),
}

/// One end of a numeric range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn admits_from_below(self, n: f64) -> bool {
        match self {
            Bound::Inclusive(b) => n >= b,
            Bound::Exclusive(b) => n > b,
        }
    }

    fn admits_from_above(self, n: f64) -> bool {
        match self {
            Bound::Inclusive(b) => n <= b,
            Bound::Exclusive(b) => n < b,
        }
    }

    fn too_small_message(self) -> String {
        match self {
            Bound::Inclusive(b) => format!("Number must be greater than or equal to {b}"),
            Bound::Exclusive(b) => format!("Number must be greater than {b}"),
        }
    }

    fn too_big_message(self) -> String {
        match self {
            Bound::Inclusive(b) => format!("Number must be less than or equal to {b}"),
            Bound::Exclusive(b) => format!("Number must be less than {b}"),
        }
    }
}

/// The type and constraints of a single field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text {
        min_len: usize,
    },
    /// A JSON number; `integer` rejects anything with a fractional part
    Number {
        integer: bool,
        min: Option<Bound>,
        max: Option<Bound>,
    },
    /// A string that parses as an absolute URL
    Url,
    /// An array whose entries must each be one of `allowed`, matched exactly
    EnumList {
        allowed: &'static [&'static str],
    },
}

/// Optional overrides for the default issue messages
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub required: &'static str,
    pub invalid_type: Option<&'static str>,
}

impl Messages {
    pub const DEFAULT: Messages = Messages {
        required: "Required",
        invalid_type: None,
    };
}

/// The full description of one field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub messages: Messages,
}

/// An object schema: an ordered table of field rules
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldRule],
}

fn default_rate() -> Value {
    Value::from(5)
}

/// What a valid movie looks like
pub const MOVIE_SCHEMA: Schema = Schema {
    fields: &[
        FieldRule {
            name: "title",
            kind: FieldKind::Text { min_len: 1 },
            presence: Presence::Required,
            messages: Messages {
                required: "Title is required",
                invalid_type: Some("Title must be a string"),
            },
        },
        FieldRule {
            name: "year",
            kind: FieldKind::Number {
                integer: true,
                min: Some(Bound::Inclusive(1888.0)),
                max: Some(Bound::Inclusive(2024.0)),
            },
            presence: Presence::Required,
            messages: Messages::DEFAULT,
        },
        FieldRule {
            name: "director",
            kind: FieldKind::Text { min_len: 0 },
            presence: Presence::Required,
            messages: Messages::DEFAULT,
        },
        FieldRule {
            name: "duration",
            kind: FieldKind::Number {
                integer: true,
                min: Some(Bound::Exclusive(0.0)),
                max: Some(Bound::Inclusive(u32::MAX as f64)),
            },
            presence: Presence::Required,
            messages: Messages::DEFAULT,
        },
        FieldRule {
            name: "rate",
            kind: FieldKind::Number {
                integer: false,
                min: Some(Bound::Inclusive(0.0)),
                max: Some(Bound::Inclusive(10.0)),
            },
            presence: Presence::Defaulted(default_rate),
            messages: Messages::DEFAULT,
        },
        FieldRule {
            name: "poster",
            kind: FieldKind::Url,
            presence: Presence::Required,
            messages: Messages::DEFAULT,
        },
        FieldRule {
            name: "genre",
            kind: FieldKind::EnumList {
                allowed: &Genre::NAMES,
            },
            presence: Presence::Required,
            messages: Messages::DEFAULT,
        },
    ],
};

// =============================================================================
// Generic validator
// =============================================================================

/// JSON type name as it appears in "received ..." messages
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Schema {
    /// Check `input` against every rule and return the normalized object.
    ///
    /// The normalized object holds only fields named by the schema (unknown
    /// keys are dropped), integral numbers in integer form, and defaults for
    /// missing defaulted fields when `mode` is [`Mode::Full`].
    pub fn validate(&self, input: &Value, mode: Mode) -> Result<Map<String, Value>, ValidationError> {
        let Some(object) = input.as_object() else {
            return Err(ValidationError::single(Issue::new(
                "",
                IssueCode::InvalidType,
                format!("Expected object, received {}", type_name(input)),
            )));
        };

        let mut normalized = Map::new();
        let mut issues = Vec::new();

        for rule in self.fields {
            match object.get(rule.name) {
                Some(value) => {
                    if let Some(value) = rule.check(value, &mut issues) {
                        normalized.insert(rule.name.to_string(), value);
                    }
                }
                None => match (mode, rule.presence) {
                    (Mode::Partial, _) => {}
                    (Mode::Full, Presence::Required) => issues.push(Issue::new(
                        rule.name,
                        IssueCode::Required,
                        rule.messages.required,
                    )),
                    (Mode::Full, Presence::Defaulted(default)) => {
                        normalized.insert(rule.name.to_string(), default());
                    }
                },
            }
        }

        if issues.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError { issues })
        }
    }
}

impl FieldRule {
    /// Check one present value. Pushes an issue per failed constraint and
    /// returns the normalized value only when none failed.
    fn check(&self, value: &Value, issues: &mut Vec<Issue>) -> Option<Value> {
        let before = issues.len();
        let normalized = match self.kind {
            FieldKind::Text { min_len } => self.check_text(value, min_len, issues),
            FieldKind::Number { integer, min, max } => {
                self.check_number(value, integer, min, max, issues)
            }
            FieldKind::Url => self.check_url(value, issues),
            FieldKind::EnumList { allowed } => self.check_enum_list(value, allowed, issues),
        };
        if issues.len() > before { None } else { normalized }
    }

    fn type_issue(&self, expected: &str, value: &Value) -> Issue {
        let message = match self.messages.invalid_type {
            Some(message) => message.to_string(),
            None => format!("Expected {expected}, received {}", type_name(value)),
        };
        Issue::new(self.name, IssueCode::InvalidType, message)
    }

    fn check_text(&self, value: &Value, min_len: usize, issues: &mut Vec<Issue>) -> Option<Value> {
        let Some(text) = value.as_str() else {
            issues.push(self.type_issue("string", value));
            return None;
        };
        if text.chars().count() < min_len {
            issues.push(Issue::new(
                self.name,
                IssueCode::TooSmall,
                format!("String must contain at least {min_len} character(s)"),
            ));
            return None;
        }
        Some(Value::String(text.to_string()))
    }

    fn check_number(
        &self,
        value: &Value,
        integer: bool,
        min: Option<Bound>,
        max: Option<Bound>,
        issues: &mut Vec<Issue>,
    ) -> Option<Value> {
        let Some(number) = value.as_f64() else {
            issues.push(self.type_issue("number", value));
            return None;
        };

        let before = issues.len();
        if integer && number.fract() != 0.0 {
            issues.push(Issue::new(
                self.name,
                IssueCode::InvalidType,
                "Expected integer, received float",
            ));
        }
        if let Some(bound) = min {
            if !bound.admits_from_below(number) {
                issues.push(Issue::new(self.name, IssueCode::TooSmall, bound.too_small_message()));
            }
        }
        if let Some(bound) = max {
            if !bound.admits_from_above(number) {
                issues.push(Issue::new(self.name, IssueCode::TooBig, bound.too_big_message()));
            }
        }
        if issues.len() > before {
            return None;
        }

        // `1979.0` and `1979` are the same number; store the integer form
        if integer && !(value.is_i64() || value.is_u64()) {
            Some(Value::from(number as i64))
        } else {
            Some(value.clone())
        }
    }

    fn check_url(&self, value: &Value, issues: &mut Vec<Issue>) -> Option<Value> {
        let Some(text) = value.as_str() else {
            issues.push(self.type_issue("string", value));
            return None;
        };
        if Url::parse(text).is_err() {
            issues.push(Issue::new(self.name, IssueCode::InvalidString, "Invalid url"));
            return None;
        }
        Some(Value::String(text.to_string()))
    }

    fn check_enum_list(
        &self,
        value: &Value,
        allowed: &[&str],
        issues: &mut Vec<Issue>,
    ) -> Option<Value> {
        let Some(items) = value.as_array() else {
            issues.push(self.type_issue("array", value));
            return None;
        };

        let expected = allowed
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(" | ");

        let before = issues.len();
        for (i, item) in items.iter().enumerate() {
            let path = format!("{}[{}]", self.name, i);
            match item.as_str() {
                Some(name) if allowed.contains(&name) => {}
                Some(name) => issues.push(Issue::new(
                    path,
                    IssueCode::InvalidEnumValue,
                    format!("Invalid enum value. Expected {expected}, received '{name}'"),
                )),
                None => issues.push(Issue::new(
                    path,
                    IssueCode::InvalidType,
                    format!("Expected {expected}, received {}", type_name(item)),
                )),
            }
        }
        if issues.len() > before {
            return None;
        }
        Some(value.clone())
    }
}

// =============================================================================
// Movie entry points
// =============================================================================

/// Decode a normalized object into its typed form.
///
/// The schema has already guaranteed every type, so this only fails if the
/// schema table and the Rust types drift apart.
fn decode<T: serde::de::DeserializeOwned>(fields: Map<String, Value>) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| {
        ValidationError::single(Issue::new("", IssueCode::InvalidType, e.to_string()))
    })
}

/// Validate a complete movie, filling `rate` with 5 when omitted
pub fn validate_full(input: &Value) -> Result<NewMovie, ValidationError> {
    let fields = MOVIE_SCHEMA.validate(input, Mode::Full)?;
    decode(fields)
}

/// Validate whichever movie fields are present
pub fn validate_partial(input: &Value) -> Result<MoviePatch, ValidationError> {
    let fields = MOVIE_SCHEMA.validate(input, Mode::Partial)?;
    decode(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alien() -> Value {
        json!({
            "title": "Alien",
            "year": 1979,
            "director": "Ridley Scott",
            "duration": 117,
            "poster": "https://x.com/a.jpg",
            "genre": ["Sci-Fi"]
        })
    }

    #[test]
    fn test_full_validation_defaults_rate() {
        let movie = validate_full(&alien()).unwrap();
        assert_eq!(movie.title, "Alien");
        assert_eq!(movie.year, 1979);
        assert_eq!(movie.duration, 117);
        assert_eq!(movie.rate, 5.0);
        assert_eq!(movie.genre, vec![Genre::SciFi]);
    }

    #[test]
    fn test_full_validation_keeps_supplied_rate() {
        let mut input = alien();
        input["rate"] = json!(8.4);
        let movie = validate_full(&input).unwrap();
        assert_eq!(movie.rate, 8.4);
    }

    #[test]
    fn test_full_validation_reports_every_missing_field() {
        let err = validate_full(&json!({})).unwrap_err();
        let paths: Vec<&str> = err.paths().collect();
        assert_eq!(paths, vec!["title", "year", "director", "duration", "poster", "genre"]);
        assert!(err.issues().iter().all(|i| i.code == IssueCode::Required));
        assert_eq!(err.issues()[0].message, "Title is required");
        assert_eq!(err.issues()[1].message, "Required");
    }

    #[test]
    fn test_title_messages() {
        let mut input = alien();
        input["title"] = json!(42);
        let err = validate_full(&input).unwrap_err();
        assert_eq!(err.issues()[0].message, "Title must be a string");

        input["title"] = json!("");
        let err = validate_full(&input).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_year_bounds() {
        let mut input = alien();
        input["year"] = json!(1700);
        let err = validate_full(&input).unwrap_err();
        assert!(err.concerns("year"));
        assert_eq!(err.issues()[0].message, "Number must be greater than or equal to 1888");

        input["year"] = json!(2025);
        let err = validate_full(&input).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::TooBig);
        assert_eq!(err.issues()[0].message, "Number must be less than or equal to 2024");

        input["year"] = json!(1888);
        assert!(validate_full(&input).is_ok());
        input["year"] = json!(2024);
        assert!(validate_full(&input).is_ok());
    }

    #[test]
    fn test_integers_reject_fractions_but_accept_integral_floats() {
        let mut input = alien();
        input["duration"] = json!(117.5);
        let err = validate_full(&input).unwrap_err();
        assert_eq!(err.issues()[0].message, "Expected integer, received float");

        input["duration"] = json!(117.0);
        let movie = validate_full(&input).unwrap();
        assert_eq!(movie.duration, 117);
    }

    #[test]
    fn test_duration_must_be_positive() {
        let mut input = alien();
        input["duration"] = json!(0);
        let err = validate_full(&input).unwrap_err();
        assert_eq!(err.issues()[0].message, "Number must be greater than 0");
    }

    #[test]
    fn test_rate_bounds() {
        let mut input = alien();
        input["rate"] = json!(10.5);
        assert!(validate_full(&input).unwrap_err().concerns("rate"));
        input["rate"] = json!(-1);
        assert!(validate_full(&input).unwrap_err().concerns("rate"));
        input["rate"] = json!(0);
        assert!(validate_full(&input).is_ok());
    }

    #[test]
    fn test_poster_must_be_absolute_url() {
        let mut input = alien();
        input["poster"] = json!("not a url");
        let err = validate_full(&input).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::InvalidString);
        assert_eq!(err.issues()[0].message, "Invalid url");

        input["poster"] = json!("/relative/path.jpg");
        assert!(validate_full(&input).is_err());
    }

    #[test]
    fn test_genre_entries_are_checked_case_sensitively() {
        let mut input = alien();
        input["genre"] = json!(["Drama", "sci-fi", 3]);
        let err = validate_full(&input).unwrap_err();
        let paths: Vec<&str> = err.paths().collect();
        assert_eq!(paths, vec!["genre[1]", "genre[2]"]);
        assert_eq!(err.issues()[0].code, IssueCode::InvalidEnumValue);
        assert!(err.issues()[0].message.ends_with("received 'sci-fi'"));
        assert!(err.concerns("genre"));
    }

    #[test]
    fn test_null_is_a_type_error_not_missing() {
        let mut input = alien();
        input["director"] = Value::Null;
        let err = validate_full(&input).unwrap_err();
        assert_eq!(err.issues()[0].code, IssueCode::InvalidType);
        assert_eq!(err.issues()[0].message, "Expected string, received null");
    }

    #[test]
    fn test_non_object_input() {
        let err = validate_full(&json!([1, 2])).unwrap_err();
        assert_eq!(err.issues()[0].path, "");
        assert_eq!(err.issues()[0].message, "Expected object, received array");
        assert!(validate_partial(&json!("x")).is_err());
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let mut input = alien();
        input["id"] = json!("caller-chosen");
        input["extra"] = json!(true);
        let fields = MOVIE_SCHEMA.validate(&input, Mode::Full).unwrap();
        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key("extra"));
    }

    #[test]
    fn test_partial_validation() {
        let patch = validate_partial(&json!({})).unwrap();
        assert!(patch.is_empty());

        let patch = validate_partial(&json!({ "rate": 9 })).unwrap();
        assert_eq!(patch.rate, Some(9.0));
        assert_eq!(patch.title, None);

        let err = validate_partial(&json!({ "year": 1700, "poster": "nope" })).unwrap_err();
        let paths: Vec<&str> = err.paths().collect();
        assert_eq!(paths, vec!["year", "poster"]);
    }

    #[test]
    fn test_partial_validation_does_not_default_rate() {
        let patch = validate_partial(&json!({ "title": "Alien 3" })).unwrap();
        assert_eq!(patch.rate, None);
    }

    #[test]
    fn test_display_joins_issues() {
        let err = validate_partial(&json!({ "year": 1700, "rate": 11 })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "year: Number must be greater than or equal to 1888; rate: Number must be less than or equal to 10"
        );
    }

    #[test]
    fn test_serializes_as_issue_array() {
        let err = validate_partial(&json!({ "year": "1979" })).unwrap_err();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            json!([{ "path": "year", "code": "invalid_type", "message": "Expected number, received string" }])
        );
    }
}
