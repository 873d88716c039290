//! The outcome type returned by every validation.
//!
//! [`Validated`] is the single success/failure channel of the crate: a
//! schema either produces a typed value or an [`Invalid`] describing every
//! failure it found. Data-shape problems never surface as panics or
//! `Result::Err`; they are ordinary `Validated::Invalid` values.

use crate::error::Invalid;

/// The result of validating a value against a schema.
///
/// Unlike `Result`, a `Validated::Invalid` is not a single error but a tree
/// of them: container schemas accumulate the failures of all of their
/// children before reporting, so one validation pass yields complete
/// feedback.
///
/// # Example
///
/// ```rust
/// use inquest::{Schema, Validated};
/// use serde_json::json;
///
/// let schema = Schema::string().min_len(3);
///
/// match schema.validate(&json!("hello")) {
///     Validated::Valid(s) => assert_eq!(s, "hello"),
///     Validated::Invalid(err) => panic!("unexpected failure: {}", err),
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Validated<T> {
    /// The value passed validation; holds the typed (possibly coerced or
    /// preprocessed) result.
    Valid(T),
    /// The value failed validation; holds the full error tree.
    Invalid(Invalid),
}

impl<T> Validated<T> {
    /// Returns true if this is a `Valid` outcome.
    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }

    /// Returns true if this is an `Invalid` outcome.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Validated::Invalid(_))
    }

    /// Maps the valid value, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        match self {
            Validated::Valid(v) => Validated::Valid(f(v)),
            Validated::Invalid(e) => Validated::Invalid(e),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<T, Invalid> {
        match self {
            Validated::Valid(v) => Ok(v),
            Validated::Invalid(e) => Err(e),
        }
    }

    /// Returns the valid value, or `None` if validation failed.
    pub fn valid(self) -> Option<T> {
        match self {
            Validated::Valid(v) => Some(v),
            Validated::Invalid(_) => None,
        }
    }

    /// Returns the error tree, or `None` if validation succeeded.
    pub fn invalid(self) -> Option<Invalid> {
        match self {
            Validated::Valid(_) => None,
            Validated::Invalid(e) => Some(e),
        }
    }

    /// Returns a reference to the error tree, or `None` if validation
    /// succeeded.
    pub fn invalid_ref(&self) -> Option<&Invalid> {
        match self {
            Validated::Valid(_) => None,
            Validated::Invalid(e) => Some(e),
        }
    }
}

impl<T> From<Validated<T>> for Result<T, Invalid> {
    fn from(v: Validated<T>) -> Self {
        v.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorNode;
    use serde_json::json;

    fn sample_invalid() -> Invalid {
        Invalid::new(ErrorNode::MissingKey, json!(null), "object")
    }

    #[test]
    fn test_valid_accessors() {
        let v: Validated<i64> = Validated::Valid(5);
        assert!(v.is_valid());
        assert!(!v.is_invalid());
        assert_eq!(v.clone().valid(), Some(5));
        assert_eq!(v.invalid(), None);
    }

    #[test]
    fn test_invalid_accessors() {
        let v: Validated<i64> = Validated::Invalid(sample_invalid());
        assert!(v.is_invalid());
        assert_eq!(v.clone().valid(), None);
        assert_eq!(v.invalid(), Some(sample_invalid()));
    }

    #[test]
    fn test_map_only_touches_valid() {
        let v: Validated<i64> = Validated::Valid(5);
        assert_eq!(v.map(|n| n * 2), Validated::Valid(10));

        let e: Validated<i64> = Validated::Invalid(sample_invalid());
        assert_eq!(e.map(|n| n * 2), Validated::Invalid(sample_invalid()));
    }

    #[test]
    fn test_into_result() {
        let v: Validated<i64> = Validated::Valid(5);
        assert_eq!(v.into_result(), Ok(5));

        let e: Validated<i64> = Validated::Invalid(sample_invalid());
        assert!(e.into_result().is_err());
    }
}
