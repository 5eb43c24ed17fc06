//! Reqwest-backed transport.
//!
//! Builds one `reqwest::Client` from [`HttpConfig`] (timeouts, proxy, user
//! agent, extra headers) and injects the bearer credential plus optional
//! organization/project headers on every request. Retry policy is the
//! caller's concern; this transport performs exactly one attempt per call.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;

use crate::config::{ClientConfig, HttpConfig};
use crate::error::Error;

use super::{FieldValue, RequestBody, Transport, TransportRequest, TransportResponse};

/// HTTP transport with credential and proxy configuration.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth_headers: HeaderMap,
}

impl HttpTransport {
    /// Build a transport from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = build_http_client(&config.http)?;
        let auth_headers = build_auth_headers(&config)?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            auth_headers,
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, Error> {
        let url = self.url_for(&request.path);
        tracing::debug!(method = %request.method, %url, "sending request");

        let mut headers = self.auth_headers.clone();
        for (name, value) in request.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => builder.json(&json),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)?),
        };

        let response = builder.send().await.map_err(Error::from)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(Error::from)?.to_vec();

        tracing::debug!(%url, status, bytes = body.len(), "received response");
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn build_form(fields: Vec<super::MultipartField>) -> Result<reqwest::multipart::Form, Error> {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match field.value {
            FieldValue::Text(text) => form.text(field.name, text),
            FieldValue::Bytes {
                data,
                filename,
                mime_type,
            } => {
                let part = reqwest::multipart::Part::bytes(data.to_vec())
                    .file_name(filename)
                    .mime_str(&mime_type)
                    .map_err(|e| Error::Configuration(format!("invalid MIME type: {e}")))?;
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}

/// Build a `reqwest::Client` from `HttpConfig`.
fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, Error> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| Error::Configuration(format!("invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    if !config.headers.is_empty() {
        let mut headers = HeaderMap::new();
        for (k, v) in &config.headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|e| Error::Configuration(format!("invalid header name '{k}': {e}")))?;
            let value = HeaderValue::from_str(v)
                .map_err(|e| Error::Configuration(format!("invalid header value for '{k}': {e}")))?;
            headers.insert(name, value);
        }
        builder = builder.default_headers(headers);
    }

    builder
        .build()
        .map_err(|e| Error::transport(format!("failed to create HTTP client: {e}")))
}

fn build_auth_headers(config: &ClientConfig) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    let bearer = format!("Bearer {}", config.api_key.expose_secret());
    let mut value = HeaderValue::from_str(&bearer)
        .map_err(|e| Error::Configuration(format!("invalid API key: {e}")))?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);

    if let Some(org) = &config.organization {
        headers.insert(
            HeaderName::from_static("openai-organization"),
            HeaderValue::from_str(org)
                .map_err(|e| Error::Configuration(format!("invalid organization: {e}")))?,
        );
    }
    if let Some(project) = &config.project {
        headers.insert(
            HeaderName::from_static("openai-project"),
            HeaderValue::from_str(project)
                .map_err(|e| Error::Configuration(format!("invalid project: {e}")))?,
        );
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ClientConfig {
        ClientConfig::builder()
            .base_url(base_url)
            .api_key("sk-test")
            .build()
            .unwrap()
    }

    #[test]
    fn url_join_handles_slashes() {
        let transport = HttpTransport::new(config("https://example.invalid/v1/")).unwrap();
        assert_eq!(
            transport.url_for("/uploads/u_1/parts"),
            "https://example.invalid/v1/uploads/u_1/parts"
        );
        assert_eq!(
            transport.url_for("batches"),
            "https://example.invalid/v1/batches"
        );
    }

    #[test]
    fn invalid_proxy_is_a_configuration_error() {
        let mut cfg = config("https://example.invalid");
        cfg.http = HttpConfig::builder().proxy("not a proxy url").build();
        match HttpTransport::new(cfg) {
            Err(Error::Configuration(msg)) => assert!(msg.contains("proxy")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn auth_headers_carry_bearer_and_org() {
        let cfg = ClientConfig::builder()
            .api_key("sk-test")
            .organization("org-1")
            .build()
            .unwrap();
        let headers = build_auth_headers(&cfg).unwrap();
        assert!(headers.contains_key(AUTHORIZATION));
        assert_eq!(
            headers
                .get("openai-organization")
                .and_then(|v| v.to_str().ok()),
            Some("org-1")
        );
    }
}
