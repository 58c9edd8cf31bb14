//! Typed HTTP client for the Confluence content REST API.

use confluence_types::{ContentDocument, UpdateContentRequest};
use reqwest::{header, StatusCode};
use std::time::Duration;

use crate::error::ConfluenceError;
use crate::models::Settings;

const USER_AGENT: &str = concat!("confluence-sync/", env!("CARGO_PKG_VERSION"));

/// Wrap note text for the page body. The text goes in verbatim.
pub fn wrap_preformatted(text: &str) -> String {
    format!("<pre>{}</pre>", text)
}

pub struct ConfluenceClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl ConfluenceClient {
    pub fn new(
        base_url: &str,
        token: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfluenceError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfluenceError::MissingHost);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfluenceError::MissingToken);
        }

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.to_string(),
            token: token.to_string(),
            client: builder.build()?,
        })
    }

    pub fn from_settings(
        settings: &Settings,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfluenceError> {
        Self::new(
            &settings.confluence_host,
            &settings.personal_access_token,
            timeout,
        )
    }

    fn content_url(&self, page_id: &str) -> String {
        format!("{}/rest/api/content/{}", self.base_url, page_id)
    }

    /// Fetch the current document. Anything but HTTP 200 is an error.
    pub async fn fetch_document(&self, page_id: &str) -> Result<ContentDocument, ConfluenceError> {
        let resp = self
            .client
            .get(self.content_url(page_id))
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            log::warn!(
                "[CONFLUENCE] GET page {} returned HTTP {}",
                page_id,
                status
            );
            return Err(ConfluenceError::FetchFailed {
                page_id: page_id.to_string(),
                status,
                body,
            });
        }

        resp.json::<ContentDocument>()
            .await
            .map_err(|source| ConfluenceError::Decode {
                page_id: page_id.to_string(),
                source,
            })
    }

    /// Replace the page body with `text`, bumping the version by one.
    ///
    /// Reads the current version first; there is no compare-and-swap, so an
    /// edit landing between the two requests is overwritten. Returns whether
    /// the update was accepted (HTTP 200).
    pub async fn replace_document(
        &self,
        page_id: &str,
        text: &str,
        title: &str,
    ) -> Result<bool, ConfluenceError> {
        let current = self.fetch_document(page_id).await?;
        let body = UpdateContentRequest::replacing(&current, title, wrap_preformatted(text));

        log::debug!(
            "[CONFLUENCE] Updating page {} to version {}",
            page_id,
            body.version.number
        );

        let resp = self
            .client
            .put(self.content_url(page_id))
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::OK {
            log::info!(
                "[CONFLUENCE] Page {} updated to version {}",
                page_id,
                body.version.number
            );
            Ok(true)
        } else {
            let text = resp.text().await.unwrap_or_default();
            log::warn!(
                "[CONFLUENCE] PUT page {} returned HTTP {}: {}",
                page_id,
                status,
                text
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{GET, PUT};
    use httpmock::MockServer;
    use serde_json::json;

    fn page_json(version: u64) -> serde_json::Value {
        json!({
            "id": "12345",
            "type": "page",
            "title": "Old title",
            "version": { "number": version }
        })
    }

    #[test]
    fn test_wrap_preformatted() {
        assert_eq!(wrap_preformatted("a\n<b>"), "<pre>a\n<b></pre>");
    }

    #[test]
    fn test_new_requires_host_and_token() {
        assert!(matches!(
            ConfluenceClient::new("  ", "tok", None),
            Err(ConfluenceError::MissingHost)
        ));
        assert!(matches!(
            ConfluenceClient::new("https://wiki", "", None),
            Err(ConfluenceError::MissingToken)
        ));
    }

    #[test]
    fn test_content_url_trims_trailing_slash() {
        let client = ConfluenceClient::new("https://wiki.example.com/", "tok", None).unwrap();
        assert_eq!(
            client.content_url("42"),
            "https://wiki.example.com/rest/api/content/42"
        );
    }

    #[tokio::test]
    async fn test_fetch_document() {
        let server = MockServer::start_async().await;
        let get = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/api/content/12345")
                    .header("authorization", "Bearer tok");
                then.status(200).json_body(page_json(3));
            })
            .await;

        let client = ConfluenceClient::new(&server.base_url(), "tok", None).unwrap();
        let doc = client.fetch_document("12345").await.unwrap();

        get.assert_async().await;
        assert_eq!(doc.content_type, "page");
        assert_eq!(doc.version.number, 3);
        assert_eq!(doc.title, "Old title");
    }

    #[tokio::test]
    async fn test_fetch_document_non_200_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/content/999");
                then.status(404).body("No content found with id: 999");
            })
            .await;

        let client = ConfluenceClient::new(&server.base_url(), "tok", None).unwrap();
        match client.fetch_document("999").await {
            Err(ConfluenceError::FetchFailed { page_id, status, body }) => {
                assert_eq!(page_id, "999");
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(body.contains("No content found"));
            }
            other => panic!("expected FetchFailed, got {:?}", other.map(|d| d.version)),
        }
    }

    #[tokio::test]
    async fn test_replace_document_bumps_version() {
        let server = MockServer::start_async().await;
        let get = server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/content/12345");
                then.status(200).json_body(page_json(7));
            })
            .await;
        let put = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/rest/api/content/12345")
                    .header("authorization", "Bearer tok")
                    .json_body(json!({
                        "version": { "number": 8 },
                        "type": "page",
                        "title": "New title",
                        "body": {
                            "storage": {
                                "value": "<pre># Heading\nline</pre>",
                                "representation": "editor"
                            }
                        }
                    }));
                then.status(200).json_body(page_json(8));
            })
            .await;

        let client = ConfluenceClient::new(&server.base_url(), "tok", None).unwrap();
        let accepted = client
            .replace_document("12345", "# Heading\nline", "New title")
            .await
            .unwrap();

        assert!(accepted);
        get.assert_async().await;
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_replace_document_rejected_returns_false() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/content/12345");
                then.status(200).json_body(page_json(1));
            })
            .await;
        let put = server
            .mock_async(|when, then| {
                when.method(PUT).path("/rest/api/content/12345");
                then.status(409).body("Version must be incremented on update");
            })
            .await;

        let client = ConfluenceClient::new(&server.base_url(), "tok", None).unwrap();
        let accepted = client.replace_document("12345", "x", "t").await.unwrap();

        assert!(!accepted);
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_replace_document_skips_put_when_fetch_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/content/12345");
                then.status(401);
            })
            .await;
        let put = server
            .mock_async(|when, then| {
                when.method(PUT).path("/rest/api/content/12345");
                then.status(200);
            })
            .await;

        let client = ConfluenceClient::new(&server.base_url(), "expired", None).unwrap();
        let result = client.replace_document("12345", "x", "t").await;

        assert!(matches!(result, Err(ConfluenceError::FetchFailed { .. })));
        assert_eq!(put.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_fetch_document_unreadable_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/content/12345");
                then.status(200)
                    .header("content-type", "text/html")
                    .body("<html>login</html>");
            })
            .await;

        let client = ConfluenceClient::new(&server.base_url(), "tok", None).unwrap();
        match client.fetch_document("12345").await {
            Err(ConfluenceError::Decode { page_id, .. }) => assert_eq!(page_id, "12345"),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_replace_document_skips_put_when_page_lacks_version() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/content/12345");
                then.status(200).json_body(json!({ "id": "12345", "title": "Old title" }));
            })
            .await;
        let put = server
            .mock_async(|when, then| {
                when.method(PUT).path("/rest/api/content/12345");
                then.status(200);
            })
            .await;

        let client = ConfluenceClient::new(&server.base_url(), "tok", None).unwrap();
        let result = client.replace_document("12345", "x", "t").await;

        assert!(matches!(result, Err(ConfluenceError::Decode { .. })));
        assert_eq!(put.hits_async().await, 0);
    }
}
