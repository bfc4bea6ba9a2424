// # Linode DNS Provider
//
// This crate provides a Linode DNS provider implementation for the DDNS
// synchronizer, talking to the Linode API v4 domain endpoints.
//
// ## Behaviour
//
// - One HTTP request per trait call (listings follow `pages` until done)
// - Full error propagation; no retry, no backoff, no caching
// - HTTP timeout configured (30 seconds)
// - Specific error messages for HTTP status codes (401/403, 404, 429, 5xx)
// - Dry-run mode: reads are performed, writes are only logged
// - Debug mode: every request and response is logged (never the token)
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Linode API v4: https://techdocs.akamai.com/linode-api/reference/api
// - List Domains: GET `/domains?page=N&page_size=M`
// - List Domain Records: GET `/domains/:domain_id/records?page=N&page_size=M`
// - Create Domain Record: POST `/domains/:domain_id/records`
// - Update Domain Record: PUT `/domains/:domain_id/records/:record_id`

use async_trait::async_trait;
use ddns_core::config::ProviderConfig;
use ddns_core::traits::{DnsProvider, Record, RecordCreate, RecordId, RecordUpdate, Zone, ZoneId};
use ddns_core::{Error, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Linode API base URL
pub const LINODE_API_BASE: &str = "https://api.linode.com/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest page size the Linode API accepts
const PAGE_SIZE: u32 = 500;

const PROVIDER_NAME: &str = "linode";

/// Linode's paginated list envelope
#[derive(Debug, Deserialize)]
struct Page<T> {
    data: Vec<T>,
    page: u32,
    pages: u32,
    #[serde(default)]
    results: u32,
}

/// Linode DNS provider
///
/// Stateless and single-shot: every call maps to fresh API requests.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (zone and record listings)
/// - Log the intended POST/PUT payload
/// - **NOT** actually modify DNS records
pub struct LinodeProvider {
    /// Linode personal access token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL (overridable for testing)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Log every request/response exchanged with the API
    debug: bool,

    /// Dry-run mode: if true, perform GET requests but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for LinodeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinodeProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("debug", &self.debug)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl LinodeProvider {
    /// Create a new Linode provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Linode personal access token with Domains read/write scope
    /// - `debug`: log every request and response
    /// - `dry_run`: perform GET requests but skip writes
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the token is empty
    /// - `Error::Provider` if the HTTP client cannot be built
    pub fn new(api_token: impl Into<String>, debug: bool, dry_run: bool) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Linode API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: LINODE_API_BASE.to_string(),
            client,
            debug,
            dry_run,
        })
    }

    /// Create a provider from the synchronizer's provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        if config.dry_run {
            tracing::warn!("Linode provider running in DRY-RUN mode - no changes will be made");
        }
        if config.debug {
            tracing::info!("Debug enabled");
        }

        let provider = Self::new(config.api_token.clone(), config.debug, config.dry_run)?;
        Ok(match &config.api_url {
            Some(url) => provider.with_base_url(url.clone()),
            None => provider,
        })
    }

    /// Point the provider at a different API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Send one authenticated request and decode its JSON body
    ///
    /// Non-success statuses are mapped to provider errors; `what`
    /// describes the operation in error messages.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, u32)],
        body: Option<&serde_json::Value>,
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        if self.debug {
            match body {
                Some(body) => tracing::debug!("--> {} {} {:?} {}", method, url, query, body),
                None => tracing::debug!("--> {} {} {:?}", method, url, query),
            }
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            if self.debug {
                tracing::debug!("<-- {} {} {}", status, url, text);
            }
            return Err(status_error(status, &text, what));
        }

        let text = response.text().await.map_err(|e| {
            Error::provider(PROVIDER_NAME, format!("Failed to read response: {}", e))
        })?;

        if self.debug {
            tracing::debug!("<-- {} {} {}", status, url, text);
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e))
        })
    }

    /// Fetch every page of a list endpoint, preserving listing order
    ///
    /// The page count is taken from the first response. A response that
    /// does not echo the requested page number is rejected.
    async fn get_all_pages<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;
        let mut total_pages = None;

        loop {
            let envelope: Page<T> = self
                .request(
                    Method::GET,
                    path,
                    &[("page", page), ("page_size", PAGE_SIZE)],
                    None,
                    what,
                )
                .await?;

            tracing::trace!(
                "{}: page {}/{} ({} results total)",
                what,
                envelope.page,
                envelope.pages,
                envelope.results
            );
            if envelope.page != page {
                return Err(Error::provider(
                    PROVIDER_NAME,
                    format!(
                        "{}: requested page {} but received page {}",
                        what, page, envelope.page
                    ),
                ));
            }
            items.extend(envelope.data);

            let pages = *total_pages.get_or_insert(envelope.pages);
            if page >= pages {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

/// Map a non-success HTTP status to a provider error
fn status_error(status: StatusCode, body: &str, what: &str) -> Error {
    let message = match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: Invalid API token or insufficient permissions. Status: {}",
            status
        ),
        404 => format!("{}: resource not found. Status: {}", what, status),
        429 => format!("Rate limit exceeded. Please retry later. Status: {}", status),
        500..=599 => format!("Linode server error (transient): {} - {}", status, body),
        _ => format!("{} failed: {} - {}", what, status, body),
    };
    Error::provider(PROVIDER_NAME, message)
}

#[async_trait]
impl DnsProvider for LinodeProvider {
    /// ```http
    /// GET /domains?page=1&page_size=500
    /// Authorization: Bearer <token>
    /// ```
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let zones: Vec<Zone> = self.get_all_pages("/domains", "List domains").await?;
        tracing::debug!("Found {} domain(s)", zones.len());
        Ok(zones)
    }

    /// ```http
    /// GET /domains/:domain_id/records?page=1&page_size=500
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(&self, zone_id: ZoneId) -> Result<Vec<Record>> {
        let path = format!("/domains/{}/records", zone_id);
        let records: Vec<Record> = self.get_all_pages(&path, "List domain records").await?;
        tracing::debug!("Found {} record(s) in domain {}", records.len(), zone_id);
        Ok(records)
    }

    async fn create_record(&self, zone_id: ZoneId, create: RecordCreate) -> Result<Record> {
        let payload = serde_json::to_value(&create)?;
        let path = format!("/domains/{}/records", zone_id);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {}{} with payload: {}",
                self.base_url,
                path,
                payload
            );
            return Ok(Record {
                id: RecordId(0),
                name: create.name,
                record_type: create.record_type,
                target: create.target,
            });
        }

        tracing::info!("Creating {} record {} -> {}", create.record_type, create.name, create.target);
        self.request(Method::POST, &path, &[], Some(&payload), "Create domain record")
            .await
    }

    /// ```http
    /// PUT /domains/:domain_id/records/:record_id
    /// { "type": "A", "name": "home", "target": "1.2.3.4" }
    /// ```
    async fn update_record(
        &self,
        zone_id: ZoneId,
        record_id: RecordId,
        update: RecordUpdate,
    ) -> Result<Record> {
        let payload = serde_json::to_value(&update)?;
        let path = format!("/domains/{}/records/{}", zone_id, record_id);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {}{} with payload: {}",
                self.base_url,
                path,
                payload
            );
            // Report the record as if the update had succeeded
            return Ok(Record {
                id: record_id,
                name: update.name,
                record_type: update.record_type,
                target: update.target,
            });
        }

        self.request(Method::PUT, &path, &[], Some(&payload), "Update domain record")
            .await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const TOKEN: &str = "test_token_abcdefghijklmnop";

    fn provider(server: &MockServer) -> LinodeProvider {
        LinodeProvider::new(TOKEN, false, false)
            .unwrap()
            .with_base_url(server.base_url())
    }

    fn page(data: serde_json::Value, page: u32, pages: u32) -> serde_json::Value {
        let results = data.as_array().map(|a| a.len()).unwrap_or(0);
        json!({ "data": data, "page": page, "pages": pages, "results": results })
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = LinodeProvider::new("", false, false).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_config() {
        let mut config = ProviderConfig::new(TOKEN);
        config.api_url = Some("http://localhost:8080/v4/".to_string());
        config.dry_run = true;

        let provider = LinodeProvider::from_config(&config).unwrap();
        assert!(provider.is_dry_run());
        assert_eq!(provider.base_url, "http://localhost:8080/v4");
    }

    #[test]
    fn test_provider_name() {
        let provider = LinodeProvider::new(TOKEN, false, false).unwrap();
        assert_eq!(provider.provider_name(), "linode");
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let provider = LinodeProvider::new("secret_token_12345", true, false).unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("LinodeProvider"));
    }

    #[tokio::test]
    async fn test_list_zones_sends_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/domains")
                    .query_param("page", "1")
                    .header("authorization", format!("Bearer {}", TOKEN));
                then.status(200).json_body(page(
                    json!([
                        { "id": 1, "domain": "example.com", "type": "master", "status": "active" },
                        { "id": 2, "domain": "other.com", "type": "master", "status": "active" }
                    ]),
                    1,
                    1,
                ));
            })
            .await;

        let zones = provider(&server).list_zones().await.unwrap();

        mock.assert_async().await;
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].id, ZoneId(1));
        assert_eq!(zones[0].domain, "example.com");
        assert_eq!(zones[1].domain, "other.com");
    }

    #[tokio::test]
    async fn test_listing_follows_pages_in_order() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET).path("/domains/1/records").query_param("page", "1");
                then.status(200).json_body(page(
                    json!([{ "id": 10, "name": "www", "type": "A", "target": "9.9.9.9" }]),
                    1,
                    2,
                ));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(GET).path("/domains/1/records").query_param("page", "2");
                then.status(200).json_body(page(
                    json!([{ "id": 11, "name": "home", "type": "A", "target": "1.2.3.4" }]),
                    2,
                    2,
                ));
            })
            .await;

        let records = provider(&server).list_records(ZoneId(1)).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["www", "home"]);
        assert_eq!(records[1].id, RecordId(11));
        assert_eq!(records[1].target, "1.2.3.4");
    }

    #[tokio::test]
    async fn test_update_record_puts_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/domains/1/records/10")
                    .json_body(json!({ "type": "A", "name": "home", "target": "5.6.7.8" }));
                then.status(200).json_body(json!({
                    "id": 10, "name": "home", "type": "A", "target": "5.6.7.8", "ttl_sec": 0
                }));
            })
            .await;

        let record = provider(&server)
            .update_record(ZoneId(1), RecordId(10), RecordUpdate::address("home", "5.6.7.8"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(record.name, "home");
        assert_eq!(record.target, "5.6.7.8");
    }

    #[tokio::test]
    async fn test_create_record_posts_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/domains/1/records")
                    .json_body(json!({ "type": "A", "name": "new", "target": "1.2.3.4" }));
                then.status(200).json_body(json!({
                    "id": 42, "name": "new", "type": "A", "target": "1.2.3.4"
                }));
            })
            .await;

        let create = RecordCreate {
            record_type: "A".to_string(),
            name: "new".to_string(),
            target: "1.2.3.4".to_string(),
            ttl_sec: None,
        };
        let record = provider(&server).create_record(ZoneId(1), create).await.unwrap();

        mock.assert_async().await;
        assert_eq!(record.id, RecordId(42));
    }

    #[tokio::test]
    async fn test_dry_run_skips_put() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/domains/1/records/10");
                then.status(200);
            })
            .await;

        let provider = LinodeProvider::new(TOKEN, false, true)
            .unwrap()
            .with_base_url(server.base_url());
        let record = provider
            .update_record(ZoneId(1), RecordId(10), RecordUpdate::address("home", "5.6.7.8"))
            .await
            .unwrap();

        mock.assert_hits_async(0).await;
        assert_eq!(record.target, "5.6.7.8");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/domains");
                then.status(401)
                    .json_body(json!({ "errors": [{ "reason": "Invalid Token" }] }));
            })
            .await;

        let err = provider(&server).list_zones().await.unwrap_err();

        match err {
            Error::Provider { provider, message } => {
                assert_eq!(provider, "linode");
                assert!(message.contains("Authentication failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/domains/1/records/10");
                then.status(503).body("maintenance");
            })
            .await;

        let err = provider(&server)
            .update_record(ZoneId(1), RecordId(10), RecordUpdate::address("home", "5.6.7.8"))
            .await
            .unwrap_err();

        mock.assert_hits_async(1).await;
        assert!(err.to_string().contains("transient"));
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/domains");
                then.status(200).body("not json");
            })
            .await;

        let err = provider(&server).list_zones().await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse response"));
    }

    #[tokio::test]
    async fn test_wrong_page_number_is_provider_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/domains");
                then.status(200).json_body(page(json!([]), 1, 2));
            })
            .await;

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            provider(&server).list_zones(),
        )
        .await
        .expect("listing must terminate");

        mock.assert_hits_async(2).await;
        match result.unwrap_err() {
            Error::Provider { provider, message } => {
                assert_eq!(provider, "linode");
                assert!(message.contains("requested page 2 but received page 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_page_count_fixed_by_first_response() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET).path("/domains").query_param("page", "1");
                then.status(200).json_body(page(
                    json!([{ "id": 1, "domain": "example.com" }]),
                    1,
                    2,
                ));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(GET).path("/domains").query_param("page", "2");
                then.status(200).json_body(page(
                    json!([{ "id": 2, "domain": "other.com" }]),
                    2,
                    9,
                ));
            })
            .await;

        let zones = provider(&server).list_zones().await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(zones.len(), 2);
    }

    #[tokio::test]
    async fn test_truncated_body_is_read_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\n\
                      Content-Type: application/json\r\n\
                      Content-Length: 100\r\n\r\n{\"data\"",
                )
                .await;
        });

        let provider = LinodeProvider::new(TOKEN, false, false)
            .unwrap()
            .with_base_url(format!("http://{}", addr));
        let err = provider.list_zones().await.unwrap_err();

        assert!(err.to_string().contains("Failed to read response"));
        assert!(!err.to_string().contains("Failed to parse response"));
    }

    #[test]
    fn test_status_error_messages() {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "", "List domains");
        assert!(err.to_string().contains("Rate limit exceeded"));

        let err = status_error(StatusCode::NOT_FOUND, "", "List domain records");
        assert!(err.to_string().contains("List domain records: resource not found"));
        assert!(!err.is_not_found());
    }
}
