//! XML rendering (`application/problem+xml`)
//!
//! The same members and omission rules as the JSON form, under a
//! `<problem>` root carrying the `urn:ietf:rfc:7807` namespace.

use serde::Serialize;
use thiserror::Error;

use crate::extension::ExtendedProblem;
use crate::problem::{Problem, Repr, XML_NAMESPACE};
use crate::validation::{ValidExtendedProblem, ValidProblem};

#[derive(Debug, Error)]
#[error("failed to encode problem as XML: {0}")]
pub struct XmlError(#[from] quick_xml::SeError);

/// XML encoding for problem details.
pub trait ToXml {
    /// Render as a `<problem>` document with the given namespace, or with no
    /// `xmlns` attribute when `namespace` is `None`.
    ///
    /// An extension payload the encoder cannot express (for instance a map
    /// key that is not a valid element name) is left out of the document.
    ///
    /// # Errors
    /// Returns [`XmlError`] if the XML encoder rejects the base members.
    fn to_xml_with_namespace(&self, namespace: Option<&str>) -> Result<String, XmlError>;

    /// Render as a `<problem xmlns="urn:ietf:rfc:7807">` document.
    ///
    /// # Errors
    /// See [`ToXml::to_xml_with_namespace`].
    fn to_xml(&self) -> Result<String, XmlError> {
        self.to_xml_with_namespace(Some(XML_NAMESPACE))
    }
}

fn render(repr: Repr<'_>, namespace: Option<&str>) -> Result<String, XmlError> {
    let doc = Repr {
        xmlns: namespace,
        ..repr
    };
    match quick_xml::se::to_string(&doc) {
        Ok(xml) => Ok(xml),
        // extension members without an XML element form are dropped, the base members still go out
        Err(_) if doc.extensions.is_some() => Ok(quick_xml::se::to_string(&Repr {
            extensions: None,
            ..doc
        })?),
        Err(err) => Err(err.into()),
    }
}

impl ToXml for Problem {
    fn to_xml_with_namespace(&self, namespace: Option<&str>) -> Result<String, XmlError> {
        render(self.repr(), namespace)
    }
}

impl ToXml for ValidProblem {
    fn to_xml_with_namespace(&self, namespace: Option<&str>) -> Result<String, XmlError> {
        render(self.repr(), namespace)
    }
}

impl<T: Serialize> ToXml for ExtendedProblem<T> {
    fn to_xml_with_namespace(&self, namespace: Option<&str>) -> Result<String, XmlError> {
        render(self.repr(), namespace)
    }
}

impl<T: Serialize> ToXml for ValidExtendedProblem<T> {
    fn to_xml_with_namespace(&self, namespace: Option<&str>) -> Result<String, XmlError> {
        render(self.repr(), namespace)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::BTreeMap;

    use http::StatusCode;

    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct CreditExt {
        balance: u32,
    }

    #[test]
    fn status_problem_renders_with_namespace() {
        let xml = Problem::from_status(StatusCode::NOT_FOUND).to_xml().unwrap();
        assert_eq!(
            xml,
            r#"<problem xmlns="urn:ietf:rfc:7807"><type>about:blank</type><title>Not Found</title><status>404</status></problem>"#
        );
    }

    #[test]
    fn namespace_can_be_dropped() {
        let xml = Problem::detailed(StatusCode::NOT_FOUND, "gone")
            .to_xml_with_namespace(None)
            .unwrap();
        assert_eq!(
            xml,
            "<problem><type>about:blank</type><title>Not Found</title><status>404</status><detail>gone</detail></problem>"
        );
    }

    #[test]
    fn text_is_escaped() {
        let xml = Problem::new()
            .with_title("Bad <input>")
            .with_detail("a & b")
            .to_xml()
            .unwrap();
        assert!(xml.contains("<title>Bad &lt;input&gt;</title>"));
        assert!(xml.contains("<detail>a &amp; b</detail>"));
    }

    #[test]
    fn sealing_does_not_change_xml() {
        let p = Problem::detailed(StatusCode::UNAUTHORIZED, "nope")
            .with_instance("/accounts/1")
            .extend(CreditExt { balance: 30 });
        let valid = p.validate().unwrap();
        assert_eq!(p.to_xml().unwrap(), valid.to_xml().unwrap());
    }

    #[test]
    fn extensions_render_as_child_element() {
        let xml = Problem::from_status(StatusCode::FORBIDDEN)
            .extend(CreditExt { balance: 30 })
            .to_xml()
            .unwrap();
        assert!(xml.contains("<extensions><balance>30</balance></extensions>"));
    }

    #[test]
    fn unencodable_extensions_are_left_out() {
        let credit = BTreeMap::from([("out of credit".to_owned(), 30)]);
        let xml = Problem::from_status(StatusCode::FORBIDDEN)
            .extend(credit)
            .to_xml()
            .unwrap();
        assert_eq!(
            xml,
            r#"<problem xmlns="urn:ietf:rfc:7807"><type>about:blank</type><title>Forbidden</title><status>403</status></problem>"#
        );

        let numbered = Problem::from_status(StatusCode::FORBIDDEN)
            .extend(BTreeMap::from([(1, "x")]))
            .validate()
            .unwrap();
        let xml = numbered.to_xml().unwrap();
        assert!(xml.contains("<status>403</status>"));
        assert!(!xml.contains("extensions"));
    }

    #[test]
    fn reads_back_into_problem() {
        let p = Problem::detailed(StatusCode::NOT_FOUND, "That thing doesn't exist.");
        let xml = p.to_xml().unwrap();
        let back: Problem = quick_xml::de::from_str(&xml).unwrap();
        assert_eq!(back, p);
    }
}
