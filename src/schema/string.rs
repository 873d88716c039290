//! String schema validation.
//!
//! [`StringSchema`] validates string values, optionally preprocessing them
//! (trimming, case folding) before running constraints. All failing
//! constraints are reported together.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::Value;

use crate::error::{ErrorNode, Invalid, JsonKind, PredicateErr};
use crate::validated::Validated;

use super::predicate::{reject_sync_entry, AsyncPredicate, Predicate};

/// A constraint applied to string values.
#[derive(Clone)]
enum StringConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    ExactLength {
        len: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        pattern_str: String,
        message: Option<String>,
    },
    StartsWith {
        prefix: String,
        message: Option<String>,
    },
    EndsWith {
        suffix: String,
        message: Option<String>,
    },
    NotBlank {
        message: Option<String>,
    },
    Email {
        message: Option<String>,
    },
}

impl StringConstraint {
    fn check(&self, value: &str) -> bool {
        match self {
            StringConstraint::MinLength { min, .. } => value.chars().count() >= *min,
            StringConstraint::MaxLength { max, .. } => value.chars().count() <= *max,
            StringConstraint::ExactLength { len, .. } => value.chars().count() == *len,
            StringConstraint::Pattern { regex, .. } => regex.is_match(value),
            StringConstraint::StartsWith { prefix, .. } => value.starts_with(prefix),
            StringConstraint::EndsWith { suffix, .. } => value.ends_with(suffix),
            StringConstraint::NotBlank { .. } => !value.trim().is_empty(),
            StringConstraint::Email { .. } => email_regex().is_match(value),
        }
    }

    fn detail(&self) -> PredicateErr {
        match self {
            StringConstraint::MinLength { min, message } => PredicateErr::new(
                "min_length",
                message
                    .clone()
                    .unwrap_or_else(|| format!("minimum allowed length is {}", min)),
            ),
            StringConstraint::MaxLength { max, message } => PredicateErr::new(
                "max_length",
                message
                    .clone()
                    .unwrap_or_else(|| format!("maximum allowed length is {}", max)),
            ),
            StringConstraint::ExactLength { len, message } => PredicateErr::new(
                "exact_length",
                message
                    .clone()
                    .unwrap_or_else(|| format!("expected length of {}", len)),
            ),
            StringConstraint::Pattern {
                pattern_str,
                message,
                ..
            } => PredicateErr::new(
                "pattern",
                message
                    .clone()
                    .unwrap_or_else(|| format!("must match pattern '{}'", pattern_str)),
            ),
            StringConstraint::StartsWith { prefix, message } => PredicateErr::new(
                "starts_with",
                message
                    .clone()
                    .unwrap_or_else(|| format!("must start with '{}'", prefix)),
            ),
            StringConstraint::EndsWith { suffix, message } => PredicateErr::new(
                "ends_with",
                message
                    .clone()
                    .unwrap_or_else(|| format!("must end with '{}'", suffix)),
            ),
            StringConstraint::NotBlank { message } => PredicateErr::new(
                "not_blank",
                message.clone().unwrap_or_else(|| "cannot be blank".to_string()),
            ),
            StringConstraint::Email { message } => PredicateErr::new(
                "email",
                message
                    .clone()
                    .unwrap_or_else(|| "expected a valid email address".to_string()),
            ),
        }
    }

    fn set_message(&mut self, msg: String) {
        match self {
            StringConstraint::MinLength { message, .. }
            | StringConstraint::MaxLength { message, .. }
            | StringConstraint::ExactLength { message, .. }
            | StringConstraint::Pattern { message, .. }
            | StringConstraint::StartsWith { message, .. }
            | StringConstraint::EndsWith { message, .. }
            | StringConstraint::NotBlank { message }
            | StringConstraint::Email { message } => *message = Some(msg),
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"))
}

/// A preprocessing step applied before constraints run.
#[derive(Clone)]
enum StringProcessor {
    Trim,
    Lowercase,
    Uppercase,
    Custom(Arc<dyn Fn(String) -> String + Send + Sync>),
}

impl StringProcessor {
    fn apply(&self, value: String) -> String {
        match self {
            StringProcessor::Trim => value.trim().to_string(),
            StringProcessor::Lowercase => value.to_lowercase(),
            StringProcessor::Uppercase => value.to_uppercase(),
            StringProcessor::Custom(f) => f(value),
        }
    }
}

/// A schema for validating string values.
///
/// Preprocessors run first (in declaration order), then every constraint
/// and predicate runs; all violations are collected into a single
/// failure, never just the first.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
/// use serde_json::json;
///
/// let schema = Schema::string().trim().min_len(3).max_len(20);
///
/// assert!(schema.validate(&json!("  hello  ")).is_valid());
/// assert!(schema.validate(&json!("  x ")).is_invalid());
/// ```
#[derive(Clone, Default)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
    predicates: Vec<Predicate<str>>,
    predicates_async: Vec<Arc<dyn AsyncPredicate<str>>>,
    preprocessors: Vec<StringProcessor>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires at least `min` characters (Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// Requires at most `max` characters.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// Requires exactly `len` characters.
    pub fn exact_len(mut self, len: usize) -> Self {
        self.constraints
            .push(StringConstraint::ExactLength { len, message: None });
        self
    }

    /// Requires the string to match a regex pattern.
    ///
    /// Returns an error if the pattern itself is invalid.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            pattern_str: pattern.to_string(),
            message: None,
        });
        Ok(self)
    }

    /// Requires the string to start with `prefix`.
    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.constraints.push(StringConstraint::StartsWith {
            prefix: prefix.into(),
            message: None,
        });
        self
    }

    /// Requires the string to end with `suffix`.
    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.constraints.push(StringConstraint::EndsWith {
            suffix: suffix.into(),
            message: None,
        });
        self
    }

    /// Requires the string to contain at least one non-whitespace character.
    pub fn not_blank(mut self) -> Self {
        self.constraints
            .push(StringConstraint::NotBlank { message: None });
        self
    }

    /// Requires the string to look like an email address.
    pub fn email(mut self) -> Self {
        self.constraints
            .push(StringConstraint::Email { message: None });
        self
    }

    /// Trims surrounding whitespace before constraints run.
    pub fn trim(mut self) -> Self {
        self.preprocessors.push(StringProcessor::Trim);
        self
    }

    /// Lowercases the string before constraints run.
    pub fn lowercase(mut self) -> Self {
        self.preprocessors.push(StringProcessor::Lowercase);
        self
    }

    /// Uppercases the string before constraints run.
    pub fn uppercase(mut self) -> Self {
        self.preprocessors.push(StringProcessor::Uppercase);
        self
    }

    /// Applies a custom pure transform before constraints run.
    pub fn preprocess(mut self, f: impl Fn(String) -> String + Send + Sync + 'static) -> Self {
        self.preprocessors.push(StringProcessor::Custom(Arc::new(f)));
        self
    }

    /// Adds a custom predicate with the given code and failure message.
    pub fn predicate(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Predicate::new(code, message, test));
        self
    }

    /// Adds an async predicate. A schema holding one can only be driven
    /// through [`validate_async`](StringSchema::validate_async).
    pub fn predicate_async(mut self, pred: impl AsyncPredicate<str> + 'static) -> Self {
        self.predicates_async.push(Arc::new(pred));
        self
    }

    /// Overrides the failure message of the most recently added constraint.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            last.set_message(message.into());
        }
        self
    }

    /// The details of every declared check, in declaration order.
    ///
    /// Part of the read-only introspection surface.
    pub fn declared_predicates(&self) -> Vec<PredicateErr> {
        self.constraints
            .iter()
            .map(|c| c.detail())
            .chain(self.predicates.iter().map(|p| p.detail()))
            .chain(self.predicates_async.iter().map(|p| p.detail()))
            .collect()
    }

    /// Returns true if this schema holds async-only checks.
    pub fn has_async_predicates(&self) -> bool {
        !self.predicates_async.is_empty()
    }

    fn typed(&self, value: &Value) -> Result<String, Invalid> {
        match value.as_str() {
            Some(s) => {
                let mut s = s.to_string();
                for p in &self.preprocessors {
                    s = p.apply(s);
                }
                Ok(s)
            }
            None => Err(Invalid::new(
                ErrorNode::Type {
                    expected: JsonKind::String,
                },
                value.clone(),
                "string",
            )),
        }
    }

    fn failing_predicates(&self, s: &str) -> Vec<PredicateErr> {
        let mut failing: Vec<PredicateErr> = self
            .constraints
            .iter()
            .filter(|c| !c.check(s))
            .map(|c| c.detail())
            .collect();
        for pred in &self.predicates {
            if !pred.check(s) {
                failing.push(pred.detail());
            }
        }
        failing
    }

    fn finish(&self, s: String, failing: Vec<PredicateErr>, raw: &Value) -> Validated<String> {
        if failing.is_empty() {
            Validated::Valid(s)
        } else {
            Validated::Invalid(Invalid::new(
                ErrorNode::Predicates(failing),
                raw.clone(),
                "string",
            ))
        }
    }

    /// Validates a value against this schema.
    ///
    /// # Panics
    ///
    /// Panics if the schema holds async predicates; use
    /// [`validate_async`](StringSchema::validate_async) for those.
    pub fn validate(&self, value: &Value) -> Validated<String> {
        if !self.predicates_async.is_empty() {
            reject_sync_entry("string");
        }
        let s = match self.typed(value) {
            Ok(s) => s,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let failing = self.failing_predicates(&s);
        self.finish(s, failing, value)
    }

    /// Validates a value, awaiting async predicates after the synchronous
    /// ones have run. Semantics otherwise identical to
    /// [`validate`](StringSchema::validate).
    pub async fn validate_async(&self, value: &Value) -> Validated<String> {
        let s = match self.typed(value) {
            Ok(s) => s,
            Err(invalid) => return Validated::Invalid(invalid),
        };
        let mut failing = self.failing_predicates(&s);
        for pred in &self.predicates_async {
            if !pred.check(&s).await {
                failing.push(pred.detail());
            }
        }
        self.finish(s, failing, value)
    }
}

#[async_trait::async_trait]
impl super::traits::SchemaLike for StringSchema {
    type Output = String;

    fn validate(&self, value: &Value) -> Validated<String> {
        StringSchema::validate(self, value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<String> {
        StringSchema::validate_async(self, value).await
    }

    fn validate_to_value(&self, value: &Value) -> Validated<Value> {
        StringSchema::validate(self, value).map(Value::String)
    }

    async fn validate_to_value_async(&self, value: &Value) -> Validated<Value> {
        StringSchema::validate_async(self, value).await.map(Value::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unwrap_invalid<T: std::fmt::Debug>(v: Validated<T>) -> Invalid {
        v.into_result().unwrap_err()
    }

    fn predicate_codes(invalid: &Invalid) -> Vec<String> {
        match &invalid.error {
            ErrorNode::Predicates(preds) => preds.iter().map(|p| p.code.clone()).collect(),
            other => panic!("expected Predicates, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_string() {
        let schema = StringSchema::new();
        assert_eq!(
            schema.validate(&json!("hello")),
            Validated::Valid("hello".to_string())
        );
    }

    #[test]
    fn test_rejects_non_string() {
        let schema = StringSchema::new();
        for value in [json!(42), json!(null), json!(true), json!([1]), json!({})] {
            let invalid = unwrap_invalid(schema.validate(&value));
            assert_eq!(
                invalid.error,
                ErrorNode::Type {
                    expected: JsonKind::String
                }
            );
            assert_eq!(invalid.value, value);
        }
    }

    #[test]
    fn test_min_len() {
        let schema = StringSchema::new().min_len(5);
        assert!(schema.validate(&json!("hello")).is_valid());

        let invalid = unwrap_invalid(schema.validate(&json!("hi")));
        assert_eq!(predicate_codes(&invalid), vec!["min_length"]);
    }

    #[test]
    fn test_all_failing_constraints_reported() {
        let schema = StringSchema::new().min_len(10).pattern(r"^\d+$").unwrap();

        let invalid = unwrap_invalid(schema.validate(&json!("abc")));
        assert_eq!(predicate_codes(&invalid), vec!["min_length", "pattern"]);
    }

    #[test]
    fn test_unicode_length_counts_chars() {
        let schema = StringSchema::new().min_len(3).max_len(5);
        assert!(schema.validate(&json!("日本語")).is_valid());
        assert!(schema.validate(&json!("🎉🎊")).is_invalid());
    }

    #[test]
    fn test_starts_and_ends_with() {
        let schema = StringSchema::new().starts_with("ab").ends_with("yz");
        assert!(schema.validate(&json!("ab...yz")).is_valid());

        let invalid = unwrap_invalid(schema.validate(&json!("nope")));
        assert_eq!(predicate_codes(&invalid), vec!["starts_with", "ends_with"]);
    }

    #[test]
    fn test_not_blank() {
        let schema = StringSchema::new().not_blank();
        assert!(schema.validate(&json!("x")).is_valid());
        assert!(schema.validate(&json!("   ")).is_invalid());
    }

    #[test]
    fn test_email() {
        let schema = StringSchema::new().email();
        assert!(schema.validate(&json!("a@b.com")).is_valid());

        let invalid = unwrap_invalid(schema.validate(&json!("not-an-email")));
        assert_eq!(predicate_codes(&invalid), vec!["email"]);
    }

    #[test]
    fn test_trim_preprocessor_visible_in_output() {
        let schema = StringSchema::new().trim().min_len(2);
        assert_eq!(
            schema.validate(&json!("  ok  ")),
            Validated::Valid("ok".to_string())
        );
    }

    #[test]
    fn test_preprocessors_run_in_declaration_order() {
        let schema = StringSchema::new()
            .trim()
            .lowercase()
            .preprocess(|s| format!("{}!", s));
        assert_eq!(
            schema.validate(&json!(" HELLO ")),
            Validated::Valid("hello!".to_string())
        );
    }

    #[test]
    fn test_custom_predicate() {
        let schema = StringSchema::new().predicate("no_spaces", "must not contain spaces", |s| {
            !s.contains(' ')
        });
        assert!(schema.validate(&json!("ok")).is_valid());

        let invalid = unwrap_invalid(schema.validate(&json!("not ok")));
        assert_eq!(predicate_codes(&invalid), vec!["no_spaces"]);
    }

    #[test]
    fn test_custom_error_message() {
        let schema = StringSchema::new().min_len(5).error("username too short");
        let invalid = unwrap_invalid(schema.validate(&json!("ab")));
        match invalid.error {
            ErrorNode::Predicates(preds) => {
                assert_eq!(preds[0].message, "username too short");
            }
            other => panic!("expected Predicates, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_regex_pattern() {
        assert!(StringSchema::new().pattern(r"[invalid").is_err());
    }

    #[test]
    fn test_declared_predicates_introspection() {
        let schema = StringSchema::new()
            .min_len(1)
            .max_len(5)
            .predicate("custom", "custom check", |_| true);
        let codes: Vec<_> = schema
            .declared_predicates()
            .into_iter()
            .map(|p| p.code)
            .collect();
        assert_eq!(codes, vec!["min_length", "max_length", "custom"]);
    }

    #[test]
    #[should_panic(expected = "async-only checks")]
    fn test_sync_entry_rejected_with_async_predicates() {
        struct AlwaysTrue;

        #[async_trait::async_trait]
        impl AsyncPredicate<str> for AlwaysTrue {
            async fn check(&self, _value: &str) -> bool {
                true
            }

            fn detail(&self) -> PredicateErr {
                PredicateErr::new("always", "always passes")
            }
        }

        let schema = StringSchema::new().predicate_async(AlwaysTrue);
        let _ = schema.validate(&json!("x"));
    }
}
