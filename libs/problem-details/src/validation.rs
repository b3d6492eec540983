//! Validation and the sealed problem variants
//!
//! [`validate`] is the single rule set for RFC 9457 compliance: the title
//! must be non-empty and the type must be a URI reference. The title is
//! checked first, so a problem failing both checks reports
//! [`ValidationError::TitleMissing`].
//!
//! [`ValidProblem`] and [`ValidExtendedProblem`] can only be produced by a
//! successful validation and expose no setters, so holding one is proof that
//! the payload is schema-valid.

use std::fmt;
use std::str::FromStr;

use http::StatusCode;
use serde::{Serialize, Serializer};
use thiserror::Error;
use url::Url;

use crate::extension::{ExtendedProblem, encode_extensions};
use crate::problem::{ABOUT_BLANK, Problem, Repr};

/// Base used only to check that a relative reference resolves.
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Reasons a problem type is rejected as a URI reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TypeUriError {
    #[error(transparent)]
    Parse(#[from] url::ParseError),

    #[error("first path segment in relative reference cannot contain a colon")]
    ColonInFirstSegment,

    #[error("invalid character {0:?} in uri")]
    InvalidCharacter(char),
}

/// Errors returned when a problem does not satisfy RFC 9457.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("problem title must be set")]
    TitleMissing,

    #[error("problem type must be a valid uri: {value:?}: {source}")]
    InvalidType {
        value: String,
        #[source]
        source: TypeUriError,
    },
}

/// A problem type that has been parsed as a URI reference.
///
/// The caller's spelling is kept verbatim so converting a sealed problem back
/// into a [`Problem`] is lossless. Absolute URIs additionally carry their
/// parsed [`Url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeUri {
    raw: String,
    url: Option<Url>,
}

impl TypeUri {
    /// Parse a problem type.
    ///
    /// An empty string stands for `about:blank`, the type RFC 9457 assumes
    /// when the member is absent.
    ///
    /// # Errors
    /// Returns [`TypeUriError`] if `raw` is neither an absolute URI nor a
    /// relative reference.
    pub fn parse(raw: &str) -> Result<Self, TypeUriError> {
        let raw = if raw.is_empty() { ABOUT_BLANK } else { raw };
        // the URL parser silently drops these, so the stored spelling would not be a URI
        if let Some(c) = raw
            .chars()
            .find(|c| c.is_ascii_control() || c.is_ascii_whitespace())
        {
            return Err(TypeUriError::InvalidCharacter(c));
        }
        match Url::parse(raw) {
            Ok(url) => Ok(Self {
                raw: raw.to_owned(),
                url: Some(url),
            }),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                check_relative_reference(raw)?;
                Ok(Self {
                    raw: raw.to_owned(),
                    url: None,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed URL, if the type is absolute.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.url.is_none()
    }

    #[must_use]
    pub fn is_about_blank(&self) -> bool {
        self.raw == ABOUT_BLANK
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.raw
    }
}

fn check_relative_reference(raw: &str) -> Result<(), TypeUriError> {
    // network-path references start with an authority, which may hold a port
    if !raw.starts_with("//") {
        let first_segment = raw.split(['/', '?', '#']).next().unwrap_or_default();
        if first_segment.contains(':') {
            return Err(TypeUriError::ColonInFirstSegment);
        }
    }
    Url::parse(RELATIVE_BASE)?.join(raw)?;
    Ok(())
}

impl FromStr for TypeUri {
    type Err = TypeUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for TypeUri {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

/// Check a problem's type and title.
///
/// # Errors
/// - [`ValidationError::TitleMissing`] if `title` is empty (checked first)
/// - [`ValidationError::InvalidType`] if `type_url` is not a URI reference
pub fn validate(type_url: &str, title: &str) -> Result<TypeUri, ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::TitleMissing);
    }
    TypeUri::parse(type_url).map_err(|source| ValidationError::InvalidType {
        value: type_url.to_owned(),
        source,
    })
}

/// The two members every problem representation must provide.
///
/// Types that embed a [`Problem`] through `#[serde(flatten)]` instead of
/// using [`ExtendedProblem`] implement this by delegating to the embedded
/// value, which gives them the same validation rules.
pub trait ProblemDetails {
    /// The problem type URI as written.
    fn type_url(&self) -> &str;

    fn title(&self) -> &str;

    /// Run [`validate`] on this problem's type and title.
    ///
    /// # Errors
    /// See [`validate`].
    fn validate_details(&self) -> Result<TypeUri, ValidationError> {
        validate(self.type_url(), self.title())
    }
}

/// A problem that also carries an HTTP status code.
pub trait StatusProblem: ProblemDetails {
    fn status(&self) -> Option<StatusCode>;
}

impl ProblemDetails for Problem {
    fn type_url(&self) -> &str {
        &self.type_url
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl StatusProblem for Problem {
    fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

impl<T> ProblemDetails for ExtendedProblem<T> {
    fn type_url(&self) -> &str {
        &self.problem.type_url
    }

    fn title(&self) -> &str {
        &self.problem.title
    }
}

impl<T> StatusProblem for ExtendedProblem<T> {
    fn status(&self) -> Option<StatusCode> {
        self.problem.status
    }
}

/// A sealed variant of [`Problem`] which is guaranteed to have valid fields.
///
/// Instances are created by [`Problem::validate`] or `ValidProblem::try_from`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ValidProblem {
    type_uri: TypeUri,
    title: String,
    status: Option<StatusCode>,
    detail: String,
    instance: String,
}

impl ValidProblem {
    fn sealed(type_uri: TypeUri, problem: Problem) -> Self {
        Self {
            type_uri,
            title: problem.title,
            status: problem.status,
            detail: problem.detail,
            instance: problem.instance,
        }
    }

    #[must_use]
    pub fn type_uri(&self) -> &TypeUri {
        &self.type_uri
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    #[must_use]
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Convert back into a mutable [`Problem`]. The sealed value is consumed;
    /// clone it first to keep a valid copy.
    pub fn into_problem(self) -> Problem {
        Problem {
            type_url: self.type_uri.into_string(),
            title: self.title,
            status: self.status,
            detail: self.detail,
            instance: self.instance,
        }
    }

    pub(crate) fn repr(&self) -> Repr<'_> {
        Repr {
            xmlns: None,
            type_url: self.type_uri.as_str(),
            title: &self.title,
            status: self.status.map(|s| s.as_u16()),
            detail: &self.detail,
            instance: &self.instance,
            extensions: None,
        }
    }
}

impl Problem {
    /// Validate this problem against RFC 9457.
    ///
    /// # Errors
    /// Returns [`ValidationError`] if the title is empty or the type is not
    /// a URI reference.
    pub fn validate(&self) -> Result<ValidProblem, ValidationError> {
        ValidProblem::try_from(self.clone())
    }
}

impl TryFrom<Problem> for ValidProblem {
    type Error = ValidationError;

    fn try_from(problem: Problem) -> Result<Self, Self::Error> {
        let type_uri = problem.validate_details()?;
        Ok(Self::sealed(type_uri, problem))
    }
}

impl From<ValidProblem> for Problem {
    fn from(valid: ValidProblem) -> Self {
        valid.into_problem()
    }
}

impl ProblemDetails for ValidProblem {
    fn type_url(&self) -> &str {
        self.type_uri.as_str()
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl StatusProblem for ValidProblem {
    fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

impl Serialize for ValidProblem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.repr().serialize(serializer)
    }
}

impl fmt::Display for ValidProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.repr().fmt(f)
    }
}

impl std::error::Error for ValidProblem {}

/// A sealed variant of [`ExtendedProblem`] which is guaranteed to contain
/// valid fields.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ValidExtendedProblem<T> {
    problem: ValidProblem,
    extensions: T,
}

impl<T> ValidExtendedProblem<T> {
    #[must_use]
    pub fn problem(&self) -> &ValidProblem {
        &self.problem
    }

    #[must_use]
    pub fn extensions(&self) -> &T {
        &self.extensions
    }

    /// Drop the extensions and convert the base fields back into a [`Problem`].
    pub fn into_problem(self) -> Problem {
        self.problem.into_problem()
    }

    pub fn into_extended_problem(self) -> ExtendedProblem<T> {
        ExtendedProblem {
            problem: self.problem.into_problem(),
            extensions: self.extensions,
        }
    }
}

impl<T: Serialize> ValidExtendedProblem<T> {
    pub(crate) fn repr(&self) -> Repr<'_> {
        Repr {
            extensions: encode_extensions(&self.extensions),
            ..self.problem.repr()
        }
    }
}

impl<T: Clone> ExtendedProblem<T> {
    /// Validate the base fields; the extensions are copied as they are.
    ///
    /// # Errors
    /// Returns [`ValidationError`] if the title is empty or the type is not
    /// a URI reference.
    pub fn validate(&self) -> Result<ValidExtendedProblem<T>, ValidationError> {
        ValidExtendedProblem::try_from(self.clone())
    }
}

impl<T> TryFrom<ExtendedProblem<T>> for ValidExtendedProblem<T> {
    type Error = ValidationError;

    fn try_from(extended: ExtendedProblem<T>) -> Result<Self, Self::Error> {
        Ok(Self {
            problem: ValidProblem::try_from(extended.problem)?,
            extensions: extended.extensions,
        })
    }
}

impl<T> From<ValidExtendedProblem<T>> for ExtendedProblem<T> {
    fn from(valid: ValidExtendedProblem<T>) -> Self {
        valid.into_extended_problem()
    }
}

impl<T> ProblemDetails for ValidExtendedProblem<T> {
    fn type_url(&self) -> &str {
        self.problem.type_uri.as_str()
    }

    fn title(&self) -> &str {
        &self.problem.title
    }
}

impl<T> StatusProblem for ValidExtendedProblem<T> {
    fn status(&self) -> Option<StatusCode> {
        self.problem.status
    }
}

impl<T: Serialize> Serialize for ValidExtendedProblem<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.repr().serialize(serializer)
    }
}

impl<T: Serialize> fmt::Display for ValidExtendedProblem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::extension::fmt_extended(&self.problem.repr(), &self.extensions, f)
    }
}

impl<T: Serialize + fmt::Debug> std::error::Error for ValidExtendedProblem<T> {}
