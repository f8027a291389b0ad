// src/client.rs

use crate::config::ConnectionSettings;
use crate::error::MapError;
use crate::location::{Location, LocationFields};
use crate::query::{LocationQuery, MAX_QUERY_LIMIT};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client for the Parse Server style REST store that holds the location tables.
///
/// The client carries the server URL, the application id and whichever key or
/// session token authenticates requests. Each table of locations is a class on
/// the server; fetching a table is a find on `classes/<table>`.
///
/// ```rust,no_run
/// use map_maker::{LocationFields, MapError, StoreClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), MapError> {
/// let client = StoreClient::new("http://localhost:1338/parse", "myAppId", None, Some("myMasterKey"))?;
/// let locations = client.fetch_locations("Cities", &LocationFields::default()).await?;
/// println!("fetched {} locations", locations.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StoreClient {
    pub server_url: String,
    pub(crate) app_id: String,
    pub(crate) master_key: Option<String>,
    pub(crate) http_client: Client,
    pub(crate) session_token: Option<String>,
}

// Request body for user login
#[derive(Serialize, Debug)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize, Debug)]
struct LoginResponse {
    #[serde(rename = "sessionToken")]
    session_token: String,
}

// Response for standard queries
#[derive(Deserialize, Debug)]
struct QueryResponse<T> {
    results: Vec<T>,
}

impl StoreClient {
    /// Creates a new `StoreClient`.
    ///
    /// # Arguments
    ///
    /// * `server_url`: Base URL of the server. A missing scheme defaults to `http://`
    ///   and a trailing `/parse` is stripped; request paths add it back.
    /// * `app_id`: Application id, sent with every request.
    /// * `rest_api_key`: Optional REST API key, used when no master key is given.
    /// * `master_key`: Optional master key. Takes precedence over the REST key.
    ///
    /// # Errors
    ///
    /// `MapError::UrlParseError` or `MapError::InvalidUrl` for an unusable URL,
    /// `MapError::InvalidHeaderValue` if an id or key cannot be sent as a header.
    pub fn new(
        server_url: &str,
        app_id: &str,
        rest_api_key: Option<&str>,
        master_key: Option<&str>,
    ) -> Result<Self, MapError> {
        let mut temp_url_string = server_url.trim().to_string();

        // Ensure scheme is present
        if !temp_url_string.starts_with("http://") && !temp_url_string.starts_with("https://") {
            temp_url_string = format!("http://{}", temp_url_string);
        }

        let parsed_server_url = Url::parse(&temp_url_string)?;

        if parsed_server_url.cannot_be_a_base() || parsed_server_url.host_str().is_none() {
            return Err(MapError::InvalidUrl(format!(
                "The server_url '{}' resolved to '{}', which cannot be a base URL. Please provide a full base URL (e.g., http://localhost:1337/parse).",
                server_url, parsed_server_url
            )));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "X-Parse-Application-Id",
            HeaderValue::from_str(app_id).map_err(MapError::InvalidHeaderValue)?,
        );

        if let Some(mk_str) = master_key {
            default_headers.insert(
                "X-Parse-Master-Key",
                HeaderValue::from_str(mk_str).map_err(MapError::InvalidHeaderValue)?,
            );
        } else if let Some(rk_str) = rest_api_key {
            default_headers.insert(
                "X-Parse-REST-API-Key",
                HeaderValue::from_str(rk_str).map_err(MapError::InvalidHeaderValue)?,
            );
        }

        let http_client = Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(MapError::ReqwestError)?;

        let mut final_server_url = parsed_server_url.as_str().trim_end_matches('/').to_string();
        if final_server_url.ends_with("/parse") {
            final_server_url.truncate(final_server_url.len() - "/parse".len());
        }

        log::debug!(
            "StoreClient initialized with base server_url: {}",
            final_server_url
        );

        Ok(Self {
            server_url: final_server_url,
            app_id: app_id.to_string(),
            master_key: master_key.map(|s| s.to_string()),
            http_client,
            session_token: None,
        })
    }

    /// Creates a client from loaded [`ConnectionSettings`].
    pub fn from_settings(settings: &ConnectionSettings) -> Result<Self, MapError> {
        Self::new(
            &settings.server_url,
            &settings.app_id,
            settings.rest_api_key.as_deref(),
            settings.master_key.as_deref(),
        )
    }

    /// Returns the current session token, if a user has logged in.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_token.is_some()
    }

    /// Logs a user in and keeps the session token for later requests.
    ///
    /// # Errors
    /// Wrong credentials come back from the server as `MapError::ObjectNotFound`.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), MapError> {
        if username.is_empty() {
            return Err(MapError::AuthenticationError(
                "username cannot be empty".to_string(),
            ));
        }
        let body = LoginRequest { username, password };
        let response: LoginResponse = self
            ._request(Method::POST, "login", Some(&body), false)
            .await?;
        self.session_token = Some(response.session_token);
        log::debug!("Logged in as '{}'", username);
        Ok(())
    }

    /// Fetches every row of `table` as a [`Location`], oldest row first.
    ///
    /// Rows are read in pages of [`MAX_QUERY_LIMIT`] until a short page comes back,
    /// so tables of any size are returned whole. An empty table yields an empty
    /// vector; rendering it is the caller's decision.
    ///
    /// # Errors
    /// `MapError::InvalidClassName` for an unusable table name, any request error,
    /// or `MapError::InvalidRecord` for the first row that cannot be read.
    pub async fn fetch_locations(
        &self,
        table: &str,
        fields: &LocationFields,
    ) -> Result<Vec<Location>, MapError> {
        let mut query = LocationQuery::for_locations(table, fields)?;
        query.limit(MAX_QUERY_LIMIT);
        if self.session_token.is_none() && self.master_key.is_some() {
            query.set_master_key(true);
        }

        let mut locations = Vec::new();
        loop {
            query.skip(locations.len());
            let page: Vec<Value> = self.find_rows(&query).await?;
            log::debug!(
                "Fetched {} row(s) from '{}' at offset {}",
                page.len(),
                table,
                locations.len()
            );

            let page_len = page.len();
            for row in &page {
                locations.push(Location::from_row(row, fields)?);
            }
            if page_len < MAX_QUERY_LIMIT {
                break;
            }
        }

        Ok(locations)
    }

    /// Executes a [`LocationQuery`] and returns the raw result rows.
    pub async fn find_rows<T: DeserializeOwned + Send + 'static>(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<T>, MapError> {
        let endpoint = format!("classes/{}", query.class_name());
        let params = query.build_query_params();
        let response: QueryResponse<T> = self
            ._get_with_url_params(&endpoint, &params, query.uses_master_key())
            .await?;
        Ok(response.results)
    }

    fn api_url(&self, endpoint: &str) -> Result<Url, MapError> {
        let base_url = Url::parse(&self.server_url).map_err(|e| {
            MapError::InvalidUrl(format!(
                "Base server URL '{}' is invalid: {}",
                self.server_url, e
            ))
        })?;

        // Trim leading slashes to avoid "/parse//classes".
        let api_path = format!("/parse/{}", endpoint.trim_start_matches('/'));

        base_url.join(&api_path).map_err(|e| {
            MapError::InvalidUrl(format!(
                "Failed to join base URL '{}' with API path '{}': {}",
                base_url, api_path, e
            ))
        })
    }

    fn auth_headers(&self, use_master_key: bool) -> Result<HeaderMap, MapError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Parse-Application-Id",
            HeaderValue::from_str(&self.app_id).map_err(MapError::InvalidHeaderValue)?,
        );

        if let Some(token) = &self.session_token {
            headers.insert(
                "X-Parse-Session-Token",
                HeaderValue::from_str(token).map_err(MapError::InvalidHeaderValue)?,
            );
        } else if use_master_key {
            match &self.master_key {
                Some(master_key) => {
                    headers.insert(
                        "X-Parse-Master-Key",
                        HeaderValue::from_str(master_key).map_err(MapError::InvalidHeaderValue)?,
                    );
                }
                None => {
                    log::warn!("Master key requested for operation but not configured.");
                    return Err(MapError::MasterKeyRequired(
                        "Master key is required for this operation but not configured.".to_string(),
                    ));
                }
            }
        }
        Ok(headers)
    }

    pub(crate) async fn _get_with_url_params<R: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        use_master_key: bool,
    ) -> Result<R, MapError> {
        let mut full_url = self.api_url(endpoint)?;
        for (key, value) in params {
            full_url.query_pairs_mut().append_pair(key, value);
        }

        log::debug!(
            "Preparing GET request: URL={}, UseMasterKey={}",
            full_url.as_str(),
            use_master_key
        );

        let mut headers = self.auth_headers(use_master_key)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .http_client
            .get(full_url)
            .headers(headers)
            .send()
            .await
            .map_err(MapError::ReqwestError)?;

        Self::process_response(response).await
    }

    // Central request method for requests with a body
    pub(crate) async fn _request<T: Serialize + Send + Sync, R: DeserializeOwned + Send + 'static>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&T>,
        use_master_key: bool,
    ) -> Result<R, MapError> {
        let full_url = self.api_url(endpoint)?;

        log::debug!(
            "Preparing request: Method={}, URL={}, UseMasterKey={}",
            method,
            full_url.as_str(),
            use_master_key
        );

        let mut headers = self.auth_headers(use_master_key)?;
        let mut request_builder = self.http_client.request(method.clone(), full_url);

        if let Some(body_data) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            let body_str = serde_json::to_string(body_data).map_err(MapError::JsonError)?;
            request_builder = request_builder.body(body_str);
        }

        let response = request_builder
            .headers(headers)
            .send()
            .await
            .map_err(MapError::ReqwestError)?;

        Self::process_response(response).await
    }

    async fn process_response<R: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<R, MapError> {
        let status = response.status();
        let body_bytes = response.bytes().await.map_err(MapError::ReqwestError)?;

        if status.is_success() {
            log::debug!(
                "Request successful. Response body: {}",
                String::from_utf8_lossy(&body_bytes)
            );
            serde_json::from_slice(&body_bytes).map_err(|e| {
                MapError::JsonDeserializationFailed(format!(
                    "Error: {}, Body: {}",
                    e,
                    String::from_utf8_lossy(&body_bytes)
                ))
            })
        } else {
            let error_body_string = String::from_utf8_lossy(&body_bytes).to_string();
            log::warn!(
                "Request failed with status {} and body: {}",
                status,
                error_body_string
            );
            match serde_json::from_slice::<Value>(&body_bytes) {
                Ok(json_value) => Err(MapError::from_response(status.as_u16(), json_value)),
                Err(_) => {
                    let fallback_json = serde_json::json!({
                        "code": status.as_u16(),
                        "error": error_body_string
                    });
                    Err(MapError::from_response(status.as_u16(), fallback_json))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_server_url() {
        let client = StoreClient::new("localhost:1338/parse/", "app", None, None).unwrap();
        assert_eq!(client.server_url, "http://localhost:1338");

        let client = StoreClient::new("https://maps.example.com", "app", Some("rest"), None).unwrap();
        assert_eq!(client.server_url, "https://maps.example.com");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn builds_api_urls_under_parse() {
        let client = StoreClient::new("http://localhost:1338/parse", "app", None, None).unwrap();
        let url = client.api_url("/classes/Cities").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1338/parse/classes/Cities");
    }

    #[test]
    fn rejects_header_unsafe_app_id() {
        assert!(matches!(
            StoreClient::new("http://localhost", "bad\nid", None, None),
            Err(MapError::InvalidHeaderValue(_))
        ));
    }

    #[test]
    fn master_key_required_when_requested_but_missing() {
        let client = StoreClient::new("http://localhost", "app", Some("rest"), None).unwrap();
        assert!(matches!(
            client.auth_headers(true),
            Err(MapError::MasterKeyRequired(_))
        ));
        assert!(client.auth_headers(false).is_ok());
    }
}
