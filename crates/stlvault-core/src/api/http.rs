/// Blocking HTTP implementation of [`VaultApi`] on top of `ureq`.
use super::{endpoints, VaultApi};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::model::{
    AssignedCategories, Category, CategoryList, CategoryRef, CreateScanResponse, FileList,
    FileQuery, FolderCategoryUpdate, FolderDetail, FolderList, FolderQuery, ScanList, ScanPath,
    ScanRecord,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for the delay between retries.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Delay before retry number `attempt` (0-based): 1s, 2s, 4s … capped at 30s.
pub fn retry_delay(attempt: u32) -> Duration {
    let ms = 1_000u64.saturating_mul(1u64 << attempt.min(16));
    Duration::from_millis(ms).min(MAX_RETRY_DELAY)
}

/// REST client for the backend.
pub struct HttpClient {
    agent: ureq::Agent,
    config: ApiConfig,
}

impl HttpClient {
    pub fn new(config: ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { agent, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Issue one request and decode its JSON body.
    fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        self.send(method, path, params, body)?
            .into_json::<T>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send with retries. Only idempotent methods are retried, so a create
    /// is never issued twice.
    fn send(
        &self,
        method: &str,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ureq::Response, ApiError> {
        let retries = if is_idempotent(method) {
            self.config.retries
        } else {
            0
        };
        let mut attempt = 0;
        loop {
            match self.send_once(method, path, params, body) {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < retries => {
                    let delay = retry_delay(attempt);
                    warn!(
                        "[HTTP] {} {} failed ({}), retrying in {:?}",
                        method, path, e, delay
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn send_once(
        &self,
        method: &str,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ureq::Response, ApiError> {
        let url = self.url(path);
        debug!("[HTTP] {} {}", method, url);

        let mut req = self
            .agent
            .request(method, &url)
            .set("Content-Type", "application/json")
            .set("X-API-Key", &self.config.api_key);
        for (key, value) in params {
            req = req.query(key, value);
        }

        let result = match body {
            Some(body) => req.send_json(body),
            None => req.call(),
        };
        match result {
            Ok(response) => {
                debug!("[HTTP] Response {} from {}", response.status(), path);
                Ok(response)
            }
            Err(ureq::Error::Status(code, response)) => {
                let reason = response.status_text().to_string();
                let body = response.into_string().unwrap_or_default();
                let error = status_error(code, path, &reason, &body);
                warn!("[HTTP] Error {} from {}: {}", code, path, error);
                Err(error)
            }
            Err(ureq::Error::Transport(t)) => {
                warn!("[HTTP] No response from {}: {}", url, t);
                Err(ApiError::Transport(t.to_string()))
            }
        }
    }
}

/// Methods that may be repeated without changing the outcome.
pub fn is_idempotent(method: &str) -> bool {
    matches!(method, "GET" | "HEAD" | "PUT" | "DELETE")
}

/// Map an error status and its body to an [`ApiError`].
pub fn status_error(code: u16, path: &str, reason: &str, body: &str) -> ApiError {
    match code {
        401 => ApiError::Unauthorized,
        404 => ApiError::NotFound {
            path: path.to_string(),
        },
        _ => ApiError::Status {
            code,
            message: error_message(body).unwrap_or_else(|| reason.to_string()),
        },
    }
}

/// Extract `error` from a JSON error body such as `{"error": "bad page"}`.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

impl VaultApi for HttpClient {
    fn create_scan(&self) -> Result<CreateScanResponse, ApiError> {
        self.request("POST", endpoints::SCAN, &[], None)
    }

    fn scan(&self, id: &str) -> Result<ScanRecord, ApiError> {
        self.request("GET", &endpoints::scan(id), &[], None)
    }

    fn scans(&self, page: u32, page_size: u32) -> Result<ScanList, ApiError> {
        self.request("GET", endpoints::SCANS, &page_params(page, page_size), None)
    }

    fn scan_paths(&self, id: &str) -> Result<Vec<ScanPath>, ApiError> {
        self.request("GET", &endpoints::scan_paths(id), &[], None)
    }

    fn folders(&self, page: u32, page_size: u32) -> Result<FolderList, ApiError> {
        self.request("GET", endpoints::FOLDERS, &page_params(page, page_size), None)
    }

    fn folder(&self, id: &str, query: &FolderQuery) -> Result<FolderDetail, ApiError> {
        self.request("GET", &endpoints::folder(id), &query.to_params(), None)
    }

    fn files(&self, query: &FileQuery) -> Result<FileList, ApiError> {
        self.request("GET", endpoints::FILES, &query.to_params(), None)
    }

    fn categories(&self, page: u32, page_size: u32) -> Result<CategoryList, ApiError> {
        self.request("GET", endpoints::CATEGORIES, &page_params(page, page_size), None)
    }

    fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        let body = json!({ "name": name });
        self.request("POST", endpoints::CATEGORIES, &[], Some(&body))
    }

    fn update_category(&self, id: &str, name: &str) -> Result<Category, ApiError> {
        let body = json!({ "name": name });
        self.request("PUT", &endpoints::category(id), &[], Some(&body))
    }

    fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.send("DELETE", &endpoints::category(id), &[], None)
            .map(|_| ())
    }

    fn update_folder_categories(
        &self,
        id: &str,
        update: &FolderCategoryUpdate,
    ) -> Result<Vec<CategoryRef>, ApiError> {
        let body = serde_json::to_value(update).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request::<AssignedCategories>(
            "PATCH",
            &endpoints::folder_categories(id),
            &[],
            Some(&body),
        )
        .map(|r| r.categories)
    }

    fn update_file_categories(
        &self,
        id: &str,
        category_ids: &[String],
    ) -> Result<Vec<CategoryRef>, ApiError> {
        let body = json!({ "category_ids": category_ids });
        self.request::<AssignedCategories>(
            "PATCH",
            &endpoints::file_categories(id),
            &[],
            Some(&body),
        )
        .map(|r| r.categories)
    }

    fn health(&self) -> Result<(), ApiError> {
        self.send("GET", endpoints::HEALTH, &[], None).map(|_| ())
    }
}

fn page_params(page: u32, page_size: u32) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("page_size", page_size.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_backoff() {
        assert_eq!(retry_delay(0), Duration::from_secs(1));
        assert_eq!(retry_delay(1), Duration::from_secs(2));
        assert_eq!(retry_delay(2), Duration::from_secs(4));
        assert_eq!(retry_delay(10), Duration::from_secs(30));
        assert_eq!(retry_delay(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn test_status_error_mapping() {
        assert_eq!(status_error(401, "/scans", "Unauthorized", ""), ApiError::Unauthorized);
        assert!(status_error(404, "/folders/x", "Not Found", "").is_not_found());
        assert_eq!(
            status_error(500, "/scans/1", "Internal Server Error", r#"{"error": "db down"}"#),
            ApiError::Status {
                code: 500,
                message: "db down".into()
            }
        );
        assert_eq!(
            status_error(502, "/scans/1", "Bad Gateway", "<html>"),
            ApiError::Status {
                code: 502,
                message: "Bad Gateway".into()
            }
        );
    }

    #[test]
    fn test_only_idempotent_methods_retry() {
        assert!(is_idempotent("GET"));
        assert!(is_idempotent("PUT"));
        assert!(is_idempotent("DELETE"));
        assert!(!is_idempotent("POST"));
        assert!(!is_idempotent("PATCH"));
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1/v1".into(),
            timeout: Duration::from_millis(500),
            retries: 0,
            ..ApiConfig::default()
        };
        let client = HttpClient::new(config);
        let err = client.scan("scan-123").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    }
}
