//! RFC 9457 Problem Details for HTTP APIs
//!
//! This crate provides the problem details data model with a strict split
//! between building and sending:
//! - [`Problem`] is a plain mutable record with a chained builder surface
//! - [`ValidProblem`] is the sealed variant, reachable only through
//!   [`Problem::validate`], and therefore always schema-valid
//! - [`ExtendedProblem`] and [`ValidExtendedProblem`] carry a caller-defined
//!   payload under the `extensions` member
//!
//! JSON goes through `serde`. XML (feature `xml`, on by default) renders the
//! same members under a `<problem>` root. With the `axum` feature every
//! variant can be returned straight from a handler.
//!
//! ```
//! use http::StatusCode;
//! use problem_details::Problem;
//!
//! let problem = Problem::from_status(StatusCode::NOT_FOUND)
//!     .with_detail("gone")
//!     .validate()?;
//!
//! assert_eq!(
//!     serde_json::to_string(&problem)?,
//!     r#"{"type":"about:blank","title":"Not Found","status":404,"detail":"gone"}"#
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod builder;

pub mod extension;
pub mod problem;
pub mod validation;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "axum")]
pub mod response;

pub use extension::ExtendedProblem;
pub use problem::{
    ABOUT_BLANK, APPLICATION_PROBLEM_JSON, APPLICATION_PROBLEM_XML, Problem, XML_NAMESPACE,
};
pub use validation::{
    ProblemDetails, StatusProblem, TypeUri, TypeUriError, ValidExtendedProblem, ValidProblem,
    ValidationError, validate,
};

#[cfg(feature = "xml")]
pub use xml::{ToXml, XmlError};

#[cfg(all(feature = "axum", feature = "xml"))]
pub use response::Xml;
