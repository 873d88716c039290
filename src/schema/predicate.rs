//! Value-level checks attached to schemas.
//!
//! A [`Predicate`] is a pure, side-effect-free check paired with the error
//! it produces on failure. Schemas run every declared predicate on every
//! validation and collect the failing ones, never short-circuiting, so
//! callers always see the complete list of violated checks.
//!
//! [`AsyncPredicate`] is the suspending counterpart for checks that need
//! I/O (uniqueness lookups, remote verification). A schema holding any
//! async predicate can only be driven through its async entry point;
//! calling the synchronous one is a programming error and panics.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PredicateErr;
use crate::validated::Validated;

/// A named, pure check over a validated value.
///
/// The closure must not mutate or capture mutable state; it is shared
/// behind an `Arc` and may be invoked concurrently from many validations.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
/// use serde_json::json;
///
/// let schema = Schema::integer().predicate("even", "must be even", |n| n % 2 == 0);
///
/// assert!(schema.validate(&json!(4)).is_valid());
/// assert!(schema.validate(&json!(5)).is_invalid());
/// ```
pub struct Predicate<T: ?Sized> {
    code: String,
    message: String,
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: ?Sized> Predicate<T> {
    /// Creates a predicate from a code, failure message, and test function.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        test: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            test: Arc::new(test),
        }
    }

    /// Runs the check.
    pub fn check(&self, value: &T) -> bool {
        (self.test)(value)
    }

    /// The error value reported when this predicate fails.
    pub fn detail(&self) -> PredicateErr {
        PredicateErr::new(self.code.clone(), self.message.clone())
    }

    /// The predicate's machine-readable code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The predicate's failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            code: self.code.clone(),
            message: self.message.clone(),
            test: Arc::clone(&self.test),
        }
    }
}

/// An asynchronous value-level check.
///
/// Implementors may suspend inside [`check`](AsyncPredicate::check); this
/// is the only place a validation call yields control. Like its synchronous
/// counterpart, an async predicate must not mutate the value.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use inquest::{AsyncPredicate, PredicateErr, Schema};
/// use serde_json::json;
///
/// struct UsernameFree;
///
/// #[async_trait]
/// impl AsyncPredicate<str> for UsernameFree {
///     async fn check(&self, value: &str) -> bool {
///         // a real implementation would query a store here
///         value != "taken"
///     }
///
///     fn detail(&self) -> PredicateErr {
///         PredicateErr::new("username_taken", "username is already in use")
///     }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let schema = Schema::string().predicate_async(UsernameFree);
/// assert!(schema.validate_async(&json!("fresh")).await.is_valid());
/// assert!(schema.validate_async(&json!("taken")).await.is_invalid());
/// # });
/// ```
#[async_trait]
pub trait AsyncPredicate<T: ?Sized>: Send + Sync {
    /// Runs the check, possibly suspending.
    async fn check(&self, value: &T) -> bool;

    /// The error value reported when this predicate fails.
    fn detail(&self) -> PredicateErr;
}

/// An asynchronous whole-value check, used by record and tuple schemas for
/// cross-field rules that need I/O.
///
/// Unlike a predicate, a check receives ownership of the constructed value
/// and may replace it, mirroring the synchronous `check` hook.
#[async_trait]
pub trait AsyncCheck<T: Send>: Send + Sync {
    /// Validates (and possibly transforms) the fully-constructed value.
    async fn check(&self, value: T) -> Validated<T>;
}

/// Aborts a synchronous validation of a schema that holds async-only
/// checks. This is a programming error, not a validation failure, so it
/// deliberately escapes the `Validated` channel.
pub(crate) fn reject_sync_entry(schema: &'static str) -> ! {
    panic!(
        "{} schema has async-only checks; call validate_async instead of validate",
        schema
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_check_and_detail() {
        let pred: Predicate<i64> = Predicate::new("positive", "must be positive", |n| *n > 0);

        assert!(pred.check(&5));
        assert!(!pred.check(&-5));

        let detail = pred.detail();
        assert_eq!(detail.code, "positive");
        assert_eq!(detail.message, "must be positive");
    }

    #[test]
    fn test_predicate_on_unsized_type() {
        let pred: Predicate<str> = Predicate::new("not_blank", "cannot be blank", |s: &str| {
            !s.trim().is_empty()
        });

        assert!(pred.check("hello"));
        assert!(!pred.check("   "));
    }

    #[test]
    fn test_predicate_clone_shares_test() {
        let pred: Predicate<i64> = Predicate::new("even", "must be even", |n| n % 2 == 0);
        let cloned = pred.clone();
        assert!(cloned.check(&2));
        assert_eq!(cloned.code(), "even");
    }
}
