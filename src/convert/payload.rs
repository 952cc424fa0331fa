//! Request/response bodies exchanged with the editing client.

use serde::{Deserialize, Serialize};

/// MIME type of exported documents.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Download name of exported documents.
pub const EXPORT_FILENAME: &str = "export.docx";

/// Result of importing a `.docx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub html: String,
}

/// Markup to export. Older clients send `markup` instead of `html`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(alias = "markup", default)]
    pub html: String,
}

impl ExportRequest {
    /// Accept either a JSON body or raw HTML.
    ///
    /// Anything that is not a JSON object is taken as the markup itself.
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim_start();
        if trimmed.starts_with('{') {
            if let Ok(request) = serde_json::from_str::<Self>(trimmed) {
                return request;
            }
        }
        Self {
            html: body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_html_field() {
        let req = ExportRequest::from_body(r#"{"html": "<p>x</p>"}"#);
        assert_eq!(req.html, "<p>x</p>");
    }

    #[test]
    fn parses_markup_alias() {
        let req = ExportRequest::from_body(r#"{"markup": "<h1>T</h1>"}"#);
        assert_eq!(req.html, "<h1>T</h1>");
    }

    #[test]
    fn missing_field_is_empty_markup() {
        assert_eq!(ExportRequest::from_body("{}").html, "");
    }

    #[test]
    fn raw_html_passes_through() {
        let body = "<!DOCTYPE html><p>{not json}</p>";
        assert_eq!(ExportRequest::from_body(body).html, body);
    }

    #[test]
    fn import_response_shape() {
        let json = serde_json::to_string(&ImportResponse {
            html: "<p>a</p>".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"html":"<p>a</p>"}"#);
    }
}
