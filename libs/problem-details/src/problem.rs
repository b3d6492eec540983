//! RFC 9457 Problem Details for HTTP APIs (mutable data model)

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::builder::problem_builder;
use crate::extension::ExtendedProblem;

/// Problem type meaning "no additional semantics beyond the status code".
pub const ABOUT_BLANK: &str = "about:blank";

/// Content type for JSON problem details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Content type for XML problem details as per RFC 9457.
pub const APPLICATION_PROBLEM_XML: &str = "application/problem+xml";

/// XML namespace of the `<problem>` element.
pub const XML_NAMESPACE: &str = "urn:ietf:rfc:7807";

/// Custom deserializer for an optional status code; `0` and absent both mean "not set"
fn deserialize_status_code<'de, D>(deserializer: D) -> Result<Option<StatusCode>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u16>::deserialize(deserializer)? {
        None | Some(0) => Ok(None),
        Some(code) => StatusCode::from_u16(code)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// RFC 9457 Problem Details for HTTP APIs.
///
/// Nothing is checked while a `Problem` is being built. Call
/// [`Problem::validate`] to obtain a [`ValidProblem`](crate::ValidProblem)
/// that is guaranteed to satisfy the schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[cfg_attr(
    feature = "utoipa",
    schema(
        title = "Problem",
        description = "RFC 9457 Problem Details for HTTP APIs"
    )
)]
#[must_use]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    /// When dereferenced, it might provide human-readable documentation.
    #[serde(rename = "type", default = "default_type_url")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    #[serde(default)]
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    /// Serializes as u16 and is omitted when not set.
    #[serde(default, deserialize_with = "deserialize_status_code")]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<u16>))]
    pub status: Option<StatusCode>,
    /// A human-readable explanation specific to this occurrence of the problem.
    #[serde(default)]
    pub detail: String,
    /// A URI reference that identifies the specific occurrence of the problem.
    #[serde(default)]
    pub instance: String,
}

fn default_type_url() -> String {
    ABOUT_BLANK.to_owned()
}

impl Default for Problem {
    fn default() -> Self {
        Self {
            type_url: default_type_url(),
            title: String::new(),
            status: None,
            detail: String::new(),
            instance: String::new(),
        }
    }
}

impl Problem {
    /// Create an empty Problem of type `about:blank`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Problem for `status`, titled with its canonical reason phrase.
    pub fn from_status(status: StatusCode) -> Self {
        Self::new().with_status(status)
    }

    /// Create a Problem for `status` with an occurrence-specific detail.
    pub fn detailed(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::from_status(status).with_detail(detail)
    }

    /// Create a Problem whose detail is the message of `err`.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::new().with_error(err)
    }

    problem_builder!();

    /// Attach an extension payload, producing an [`ExtendedProblem`].
    pub fn extend<T>(self, extensions: T) -> ExtendedProblem<T> {
        ExtendedProblem::from_problem(self, extensions)
    }

    pub(crate) fn repr(&self) -> Repr<'_> {
        Repr {
            xmlns: None,
            type_url: &self.type_url,
            title: &self.title,
            status: self.status.map(|s| s.as_u16()),
            detail: &self.detail,
            instance: &self.instance,
            extensions: None,
        }
    }
}

impl Serialize for Problem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.repr().serialize(serializer)
    }
}

/// Renders `<title> (<status>) - <detail>`.
impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.repr().fmt(f)
    }
}

impl std::error::Error for Problem {}

/// Borrowed wire shape shared by every problem variant.
///
/// Sealed and extended values render through this one struct, so validating
/// a problem can never change its serialized form.
#[derive(Serialize)]
#[serde(rename = "problem")]
pub(crate) struct Repr<'a> {
    #[serde(rename = "@xmlns", skip_serializing_if = "Option::is_none")]
    pub(crate) xmlns: Option<&'a str>,
    #[serde(rename = "type")]
    pub(crate) type_url: &'a str,
    pub(crate) title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) status: Option<u16>,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub(crate) detail: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub(crate) instance: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) extensions: Option<serde_json::Value>,
}

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {}",
            self.title,
            self.status.unwrap_or_default(),
            self.detail
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an error occurred")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn new_problem_is_about_blank_and_empty() {
        let p = Problem::new();
        assert_eq!(p.type_url, ABOUT_BLANK);
        assert!(p.title.is_empty());
        assert_eq!(p.status, None);
        assert!(p.detail.is_empty());
        assert!(p.instance.is_empty());
    }

    #[test]
    fn status_sets_default_title() {
        let p = Problem::new().with_status(StatusCode::NOT_FOUND);
        assert_eq!(p.title, "Not Found");
        assert_eq!(p.status, Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn title_after_status_wins() {
        let p = Problem::new()
            .with_status(StatusCode::NOT_FOUND)
            .with_title("Custom");
        assert_eq!(p.title, "Custom");
    }

    #[test]
    fn status_after_title_keeps_title() {
        let p = Problem::new()
            .with_title("Custom")
            .with_status(StatusCode::NOT_FOUND);
        assert_eq!(p.title, "Custom");
        assert_eq!(p.status, Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn status_without_reason_phrase_leaves_title_empty() {
        let status = StatusCode::from_u16(599).unwrap();
        let p = Problem::new().with_status(status);
        assert!(p.title.is_empty());
        assert_eq!(p.status, Some(status));
    }

    #[test]
    fn setters_are_idempotent() {
        let once = Problem::new()
            .with_type("https://example.com/probs/out-of-credit")
            .with_status(StatusCode::FORBIDDEN)
            .with_detail("balance too low");
        let twice = Problem::new()
            .with_type("https://example.com/probs/out-of-credit")
            .with_type("https://example.com/probs/out-of-credit")
            .with_status(StatusCode::FORBIDDEN)
            .with_status(StatusCode::FORBIDDEN)
            .with_detail("balance too low")
            .with_detail("balance too low");
        assert_eq!(once, twice);
    }

    #[test]
    fn detailed_constructor() {
        let p = Problem::detailed(StatusCode::NOT_FOUND, "couldn't find it");
        assert_eq!(p.type_url, ABOUT_BLANK);
        assert_eq!(p.title, "Not Found");
        assert_eq!(p.status, Some(StatusCode::NOT_FOUND));
        assert_eq!(p.detail, "couldn't find it");
    }

    #[test]
    fn detail_from_format_args() {
        let p = Problem::new().with_detail_fmt(format_args!("{:?} is not a valid integer", "foo"));
        assert_eq!(p.detail, r#""foo" is not a valid integer"#);
    }

    #[test]
    fn detail_from_error() {
        let p = Problem::from_error(&Boom).with_status(StatusCode::BAD_REQUEST);
        assert_eq!(p.detail, "an error occurred");
        assert_eq!(p.title, "Bad Request");

        let boxed: Box<dyn std::error::Error> = Box::new(Boom);
        let p = Problem::new().with_error(boxed.as_ref());
        assert_eq!(p.detail, "an error occurred");
    }

    #[test]
    fn display_includes_title_status_and_detail() {
        let p = Problem::detailed(StatusCode::NOT_FOUND, "gone");
        assert_eq!(p.to_string(), "Not Found (404) - gone");
        assert_eq!(Problem::new().with_title("Oops").to_string(), "Oops (0) - ");
    }

    #[test]
    fn status_problem_serializes_without_optional_members() {
        let p = Problem::from_status(StatusCode::NOT_FOUND);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"type":"about:blank","title":"Not Found","status":404}"#);
    }

    #[test]
    fn detail_is_serialized_when_set() {
        let p = Problem::from_status(StatusCode::NOT_FOUND).with_detail("gone");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(
            json,
            r#"{"type":"about:blank","title":"Not Found","status":404,"detail":"gone"}"#
        );
    }

    #[test]
    fn invalid_problem_still_serializes() {
        let p = Problem::new().with_type("::/");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"type":"::/","title":""}"#);
    }

    #[test]
    fn deserializes_with_defaults() {
        let p: Problem = serde_json::from_str(r#"{"title":"Not Found","status":404}"#).unwrap();
        assert_eq!(p.type_url, ABOUT_BLANK);
        assert_eq!(p.status, Some(StatusCode::NOT_FOUND));

        let p: Problem = serde_json::from_str(r#"{"title":"Teapot","status":0}"#).unwrap();
        assert_eq!(p.status, None);

        let err = serde_json::from_str::<Problem>(r#"{"title":"Bad","status":42}"#);
        assert!(err.is_err());
    }

    #[cfg(feature = "utoipa")]
    #[test]
    fn openapi_schema_describes_wire_members() {
        let schema = serde_json::to_value(<Problem as utoipa::PartialSchema>::schema()).unwrap();
        let properties = &schema["properties"];
        for member in ["type", "title", "status", "detail", "instance"] {
            assert!(properties.get(member).is_some(), "missing {member}");
        }
        assert!(properties.get("type_url").is_none());
        assert_eq!(<Problem as utoipa::ToSchema>::name(), "Problem");
    }

    #[test]
    fn json_round_trip_preserves_fields() {
        let p = Problem::new()
            .with_type("https://example.com")
            .with_status(StatusCode::BAD_REQUEST)
            .with_detail("Here are some details")
            .with_instance("https://example.com/errors/150");
        let json = serde_json::to_string(&p).unwrap();
        let back: Problem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
