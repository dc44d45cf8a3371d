//! HTTP document-store client.
//!
//! Speaks the data-service findOne protocol: `POST {base}/action/findOne`
//! with `{"database", "collection", "filter": {"_id": {"$oid": "…"}}}`,
//! answered by `{"document": {...} | null}`. One attempt per lookup — the
//! per-identifier error policy lives in the reconciler, not here. Auth
//! secrets are resolved from environment variables only.

use std::time::Duration;

use serde::Deserialize;

use driftcheck_recon::config::StoreConfig;
use driftcheck_recon::store::{Document, DocumentStore, StoreError};
use driftcheck_types::{Namespace, ObjectId};

use crate::exit_codes;
use crate::CliError;

const USER_AGENT: &str = concat!("driftcheck/", env!("CARGO_PKG_VERSION"));

// ── Auth resolution ─────────────────────────────────────────────────

#[derive(Debug)]
enum AuthMethod {
    None,
    Bearer(String),
    Header(String, String),
}

fn resolve_auth(auth_str: &str) -> Result<AuthMethod, CliError> {
    if auth_str == "none" {
        return Ok(AuthMethod::None);
    }

    if let Some(env_var) = auth_str.strip_prefix("bearer-env:") {
        let token = resolve_env(env_var, "bearer token")?;
        return Ok(AuthMethod::Bearer(token));
    }

    if let Some(rest) = auth_str.strip_prefix("header-env:") {
        let parts: Vec<&str> = rest.splitn(2, ':').collect();
        if parts.len() != 2 {
            return Err(CliError {
                code: exit_codes::EXIT_USAGE,
                message: "header-env format: header-env:HEADER_NAME:ENV_VAR".into(),
                hint: Some("example: --source-auth header-env:X-API-Key:SOURCE_KEY".into()),
            });
        }
        let value = resolve_env(parts[1], &format!("header {}", parts[0]))?;
        return Ok(AuthMethod::Header(parts[0].to_string(), value));
    }

    Err(CliError {
        code: exit_codes::EXIT_USAGE,
        message: format!("unknown auth method: {}", auth_str),
        hint: Some("supported: none, bearer-env:VAR, header-env:NAME:VAR".into()),
    })
}

fn resolve_env(var_name: &str, label: &str) -> Result<String, CliError> {
    std::env::var(var_name)
        .map_err(|_| CliError {
            code: exit_codes::EXIT_STORE_NOT_AUTH,
            message: format!("environment variable {} not set (needed for {})", var_name, label),
            hint: Some(format!("export {}=<value>", var_name)),
        })
        .and_then(|v| {
            let trimmed = v.trim().to_string();
            if trimmed.is_empty() {
                Err(CliError {
                    code: exit_codes::EXIT_STORE_NOT_AUTH,
                    message: format!(
                        "environment variable {} is empty (needed for {})",
                        var_name, label
                    ),
                    hint: None,
                })
            } else {
                Ok(trimmed)
            }
        })
}

// ── Client ──────────────────────────────────────────────────────────

pub struct HttpStore {
    label: String,
    endpoint: String,
    auth: AuthMethod,
    http: reqwest::blocking::Client,
}

impl HttpStore {
    pub fn new(label: &str, config: &StoreConfig) -> Result<Self, CliError> {
        let base = url::Url::parse(&config.url)
            .map_err(|e| CliError::args(format!("invalid {label} store URL: {e}")))?;
        let auth = resolve_auth(&config.auth)?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError::io(format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!("{}/action/findOne", base.as_str().trim_end_matches('/'));

        Ok(Self {
            label: label.to_string(),
            endpoint,
            auth,
            http,
        })
    }

    /// Startup reachability check: any HTTP answer (whatever the status)
    /// means the service is up; only transport failures count as down.
    pub fn probe(&self) -> Result<(), StoreError> {
        let body = serde_json::json!({
            "database": "_driftcheck",
            "collection": "_probe",
            "filter": {},
        });
        self.post(&body).map(|_| ())
    }

    fn post(&self, body: &serde_json::Value) -> Result<reqwest::blocking::Response, StoreError> {
        let mut req = self.http.post(&self.endpoint).json(body);
        req = match &self.auth {
            AuthMethod::None => req,
            AuthMethod::Bearer(token) => req.bearer_auth(token),
            AuthMethod::Header(name, value) => req.header(name.as_str(), value.as_str()),
        };
        req.send().map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout(e.to_string())
            } else {
                StoreError::Connect(e.to_string())
            }
        })
    }
}

#[derive(Deserialize)]
struct FindOneResponse {
    document: Option<Box<serde_json::value::RawValue>>,
}

impl DocumentStore for HttpStore {
    fn label(&self) -> &str {
        &self.label
    }

    fn find_by_id(
        &self,
        namespace: &Namespace,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let body = serde_json::json!({
            "database": namespace.database,
            "collection": namespace.collection,
            "filter": { "_id": { "$oid": id.to_string() } },
        });

        let resp = self.post(&body)?;
        let status = resp.status().as_u16();

        if status == 401 || status == 403 {
            return Err(StoreError::Auth(format!("HTTP {status}")));
        }
        if !(200..300).contains(&status) {
            let text = resp.text().unwrap_or_default();
            return Err(StoreError::Server {
                status,
                message: text.chars().take(200).collect(),
            });
        }

        let text = resp
            .text()
            .map_err(|e| StoreError::Decode(format!("cannot read response body: {e}")))?;
        let parsed: FindOneResponse = serde_json::from_str(&text)
            .map_err(|e| StoreError::Decode(format!("unexpected findOne response: {e}")))?;

        match parsed.document {
            // The raw slice is the document's exact byte encoding.
            Some(raw) => Document::from_json_text(raw.get()).map(Some),
            None => Ok(None),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn store_for(server: &MockServer, timeout_secs: u64) -> HttpStore {
        HttpStore::new(
            "source",
            &StoreConfig {
                url: server.base_url(),
                auth: "none".into(),
                timeout_secs,
            },
        )
        .unwrap()
    }

    fn ns() -> Namespace {
        Namespace::new("testshard", "col2")
    }

    fn oid() -> ObjectId {
        ObjectId::parse_hex("693885e2f227ce8067db8d33").unwrap()
    }

    #[test]
    fn found_document_keeps_raw_bytes() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/action/findOne")
                .json_body_partial(r#"{"database": "testshard", "collection": "col2"}"#);
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"document":{"b": 2, "a": 1}}"#);
        });

        let store = store_for(&server, 5);
        let doc = store.find_by_id(&ns(), &oid()).unwrap().unwrap();

        mock.assert();
        // Exact wire bytes, not a re-serialization.
        assert_eq!(doc.raw_bytes(), br#"{"b": 2, "a": 1}"#);
        assert_eq!(doc.value()["a"], 1);
    }

    #[test]
    fn null_document_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/action/findOne");
            then.status(200).body(r#"{"document":null}"#);
        });

        let store = store_for(&server, 5);
        assert!(store.find_by_id(&ns(), &oid()).unwrap().is_none());
    }

    #[test]
    fn request_carries_extended_json_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/action/findOne").json_body_partial(
                r#"{"filter": {"_id": {"$oid": "693885e2f227ce8067db8d33"}}}"#,
            );
            then.status(200).body(r#"{"document":null}"#);
        });

        let store = store_for(&server, 5);
        store.find_by_id(&ns(), &oid()).unwrap();
        mock.assert();
    }

    #[test]
    fn auth_rejection_maps_to_auth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/action/findOne");
            then.status(401).body(r#"{"error":"invalid token"}"#);
        });

        let store = store_for(&server, 5);
        assert!(matches!(
            store.find_by_id(&ns(), &oid()),
            Err(StoreError::Auth(_))
        ));
    }

    #[test]
    fn server_failure_maps_to_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/action/findOne");
            then.status(503).body("unavailable");
        });

        let store = store_for(&server, 5);
        let err = store.find_by_id(&ns(), &oid()).unwrap_err();
        assert!(matches!(err, StoreError::Server { status: 503, .. }));
    }

    #[test]
    fn slow_store_maps_to_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/action/findOne");
            then.status(200)
                .body(r#"{"document":null}"#)
                .delay(Duration::from_millis(1500));
        });

        let store = store_for(&server, 1);
        assert!(matches!(
            store.find_by_id(&ns(), &oid()),
            Err(StoreError::Timeout(_))
        ));
    }

    #[test]
    fn garbage_response_maps_to_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/action/findOne");
            then.status(200).body("not json at all");
        });

        let store = store_for(&server, 5);
        assert!(matches!(
            store.find_by_id(&ns(), &oid()),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn probe_accepts_any_http_answer() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/action/findOne");
            then.status(400).body(r#"{"error":"unknown database"}"#);
        });

        let store = store_for(&server, 5);
        assert!(store.probe().is_ok());
    }

    #[test]
    fn probe_fails_when_nothing_listens() {
        // Port 1 on localhost: nothing listens, connection refused.
        let store = HttpStore::new(
            "dest",
            &StoreConfig {
                url: "http://127.0.0.1:1".into(),
                auth: "none".into(),
                timeout_secs: 1,
            },
        )
        .unwrap();
        assert!(store.probe().is_err());
    }

    #[test]
    fn bearer_auth_header_is_sent() {
        std::env::set_var("__DRIFTCHECK_TEST_TOKEN", "secret123");
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/action/findOne")
                .header("authorization", "Bearer secret123");
            then.status(200).body(r#"{"document":null}"#);
        });

        let store = HttpStore::new(
            "source",
            &StoreConfig {
                url: server.base_url(),
                auth: "bearer-env:__DRIFTCHECK_TEST_TOKEN".into(),
                timeout_secs: 5,
            },
        )
        .unwrap();
        store.find_by_id(&ns(), &oid()).unwrap();
        mock.assert();
        std::env::remove_var("__DRIFTCHECK_TEST_TOKEN");
    }

    #[test]
    fn missing_auth_env_is_a_not_auth_error() {
        std::env::remove_var("__DRIFTCHECK_MISSING_TOKEN");
        let err = HttpStore::new(
            "source",
            &StoreConfig {
                url: "https://example.com".into(),
                auth: "bearer-env:__DRIFTCHECK_MISSING_TOKEN".into(),
                timeout_secs: 5,
            },
        )
        .unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_STORE_NOT_AUTH);
    }

    #[test]
    fn unknown_auth_spec_is_a_usage_error() {
        let err = resolve_auth("oauth:something").unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_USAGE);
    }
}
