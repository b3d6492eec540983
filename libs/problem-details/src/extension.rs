//! Problem details carrying a caller-defined extension payload
//!
//! RFC 9457 lets problem types add members of their own. [`ExtendedProblem`]
//! composes a [`Problem`] with a payload of any serializable shape, rendered
//! under the `extensions` member:
//!
//! ```
//! use http::StatusCode;
//! use problem_details::ExtendedProblem;
//! use serde::Serialize;
//!
//! #[derive(Clone, Default, Serialize)]
//! struct Credit {
//!     balance: u32,
//!     accounts: Vec<String>,
//! }
//!
//! let problem = ExtendedProblem::<Credit>::new()
//!     .with_status(StatusCode::FORBIDDEN)
//!     .with_extension(Credit { balance: 30, accounts: vec!["/account/12345".to_owned()] })
//!     .validate()?;
//!
//! assert_eq!(
//!     serde_json::to_string(&problem)?,
//!     r#"{"type":"about:blank","title":"Forbidden","status":403,"extensions":{"balance":30,"accounts":["/account/12345"]}}"#
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! To place extension members next to the base members instead, embed a
//! [`Problem`] with `#[serde(flatten)]` in your own type and implement
//! [`ProblemDetails`](crate::ProblemDetails) for it.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::builder::problem_builder;
use crate::problem::{Problem, Repr};

/// A [`Problem`] extended with an `extensions` member of type `T`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
#[must_use]
pub struct ExtendedProblem<T> {
    #[serde(flatten)]
    pub problem: Problem,
    /// Members specific to this problem type.
    #[serde(default)]
    pub extensions: T,
}

impl<T: Default> ExtendedProblem<T> {
    /// Create an extended problem with the same defaults as [`Problem::new`]
    /// and a default extension payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extended problem whose detail is the message of `err`.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::new().with_error(err)
    }
}

impl<T> ExtendedProblem<T> {
    /// Attach `extensions` to an existing problem, keeping all its fields.
    pub fn from_problem(problem: Problem, extensions: T) -> Self {
        Self {
            problem,
            extensions,
        }
    }

    problem_builder!(problem);

    /// Replace the extension payload.
    pub fn with_extension(mut self, extensions: T) -> Self {
        self.extensions = extensions;
        self
    }

    /// Split into the base problem and the extension payload.
    pub fn into_parts(self) -> (Problem, T) {
        (self.problem, self.extensions)
    }
}

impl<T: Serialize> ExtendedProblem<T> {
    pub(crate) fn repr(&self) -> Repr<'_> {
        Repr {
            extensions: encode_extensions(&self.extensions),
            ..self.problem.repr()
        }
    }
}

impl<T: Default> From<Problem> for ExtendedProblem<T> {
    fn from(problem: Problem) -> Self {
        Self::from_problem(problem, T::default())
    }
}

/// Encode an extension payload for the `extensions` member.
///
/// Returns `None` when the member must be omitted: the payload failed to
/// encode, or it encoded to `null`, `{}` or `[]`.
pub(crate) fn encode_extensions<T: Serialize + ?Sized>(
    extensions: &T,
) -> Option<serde_json::Value> {
    use serde_json::Value;

    match serde_json::to_value(extensions) {
        Ok(Value::Null) | Err(_) => None,
        Ok(Value::Object(map)) if map.is_empty() => None,
        Ok(Value::Array(items)) if items.is_empty() => None,
        Ok(value) => Some(value),
    }
}

/// Renders `<title> (<status>) - <detail> - <extensions as JSON>`.
///
/// An extension payload that fails to encode renders as an empty fragment.
pub(crate) fn fmt_extended<T: Serialize + ?Sized>(
    base: &Repr<'_>,
    extensions: &T,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let ext = serde_json::to_string(extensions).unwrap_or_default();
    write!(f, "{base} - {ext}")
}

impl<T: Serialize> Serialize for ExtendedProblem<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.repr().serialize(serializer)
    }
}

impl<T: Serialize> fmt::Display for ExtendedProblem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_extended(&self.problem.repr(), &self.extensions, f)
    }
}

impl<T: Serialize + fmt::Debug> std::error::Error for ExtendedProblem<T> {}
