//! Axum integration: make problems directly usable as responses
//!
//! Every problem variant renders as `application/problem+json`. Wrap a value
//! in [`Xml`] to render `application/problem+xml` instead. The HTTP status is
//! the problem's status when one is set.

use std::fmt;

use axum::body::Body;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::extension::ExtendedProblem;
use crate::problem::{APPLICATION_PROBLEM_JSON, Problem};
use crate::validation::{ValidExtendedProblem, ValidProblem};

fn respond<E: fmt::Display>(
    status: Option<StatusCode>,
    content_type: &'static str,
    body: Result<impl Into<Body>, E>,
) -> Response {
    match body {
        Ok(body) => {
            let body: Body = body.into();
            let mut resp = (
                [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
                body,
            )
                .into_response();
            if let Some(status) = status {
                *resp.status_mut() = status;
            }
            resp
        }
        Err(err) => {
            tracing::error!(error = %err, content_type, "failed to encode problem details");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn json_response<P: Serialize>(status: Option<StatusCode>, problem: &P) -> Response {
    respond(status, APPLICATION_PROBLEM_JSON, serde_json::to_vec(problem))
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        json_response(self.status, &self)
    }
}

impl IntoResponse for ValidProblem {
    fn into_response(self) -> Response {
        json_response(self.status(), &self)
    }
}

impl<T: Serialize> IntoResponse for ExtendedProblem<T> {
    fn into_response(self) -> Response {
        json_response(self.problem.status, &self)
    }
}

impl<T: Serialize> IntoResponse for ValidExtendedProblem<T> {
    fn into_response(self) -> Response {
        json_response(self.problem().status(), &self)
    }
}

/// Renders the wrapped problem as `application/problem+xml`.
#[cfg(feature = "xml")]
#[derive(Debug, Clone)]
pub struct Xml<P>(pub P);

#[cfg(feature = "xml")]
impl<P> IntoResponse for Xml<P>
where
    P: crate::xml::ToXml + crate::validation::StatusProblem,
{
    fn into_response(self) -> Response {
        respond(
            self.0.status(),
            crate::problem::APPLICATION_PROBLEM_XML,
            self.0.to_xml(),
        )
    }
}
