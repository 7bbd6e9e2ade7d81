// API client module: a small blocking HTTP client for the NAC REST
// endpoints. One call per invocation, no retries, no timeouts.
//
// GET paths return decoded JSON; PUT/POST/DELETE paths return the raw
// response body. Any status other than 200 becomes `Error::Protocol`.

use std::net::Ipv4Addr;

use clap::ValueEnum;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/tallac";

const USERS_PATH: &str = "/api/nac/users";
const USERS_AUTH_PATH: &str = "/api/nac/users/auth";
const LOGS_PATH: &str = "/api/nac/logs";
const JSON_MIME: &str = "application/json";

/// Where to send requests, and the `ip` value carried by user updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Value sent in the `ip` field of every user update. The server has
    /// historically been sent `0` here.
    pub change_user_ip: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            change_user_ip: 0,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_change_user_ip(mut self, ip: i64) -> Self {
        self.change_user_ip = ip;
        self
    }
}

#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserState {
    Guest,
    Authenticated,
    Unauthenticated,
}

/// Body of `PUT /api/nac/users`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub mac: String,
    pub ip: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<UserState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    Guest,
    Client,
}

/// Body of `PUT /api/nac/users/auth`. Without `ip` the server uses the
/// address the request came from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthRequest {
    pub authtype: AuthType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AuthRequest {
    pub fn guest(ip: Option<Ipv4Addr>) -> Self {
        AuthRequest {
            authtype: AuthType::Guest,
            ip,
            username: None,
            password: None,
        }
    }

    pub fn client(ip: Option<Ipv4Addr>, username: &str, password: &str) -> Self {
        AuthRequest {
            authtype: AuthType::Client,
            ip,
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }
}

/// Lookup key for `GET /api/nac/users`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter<'a> {
    All,
    Mac(&'a str),
    Ip(Ipv4Addr),
}

impl UserFilter<'_> {
    fn path(&self) -> String {
        // The MAC has already been format-checked and an Ipv4Addr prints
        // only digits and dots, so neither needs escaping.
        match self {
            UserFilter::All => USERS_PATH.to_string(),
            UserFilter::Mac(mac) => format!("{USERS_PATH}?mac={mac}"),
            UserFilter::Ip(ip) => format!("{USERS_PATH}?ip={ip}"),
        }
    }
}

/// One HTTP call: verb, path below the base URL and an optional JSON body,
/// already serialized so field order on the wire is the struct's order.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Request {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(method: Method, path: impl Into<String>, body: String) -> Self {
        Request {
            method,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Body text safe for the debug log: a top-level `password` is masked.
fn redact_password(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut fields)) if fields.contains_key("password") => {
            fields.insert("password".into(), Value::String("***".into()));
            Value::Object(fields).to_string()
        }
        _ => body.to_string(),
    }
}

/// Blocking client bound to one NAC server.
#[derive(Clone)]
pub struct NacClient {
    client: Client,
    config: ClientConfig,
}

impl NacClient {
    pub fn new(mut config: ClientConfig) -> Result<Self> {
        while config.base_url.ends_with('/') {
            config.base_url.pop();
        }
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("invalid base URL {}: {e}", config.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(Error::Config(format!(
                "base URL must be an http(s) URL with a host: {}",
                config.base_url
            )));
        }
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(NacClient { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Send `req` and return the response body as text. Only a 200 is
    /// treated as success.
    pub fn execute(&self, req: &Request) -> Result<String> {
        let url = self.url(&req.path);
        let logged_body = req.body.as_deref().map(redact_password).unwrap_or_default();
        debug!(method = %req.method, url = %url, body = %logged_body, "sending request");

        let mut builder = self.client.request(req.method.clone(), &url);
        builder = match &req.body {
            Some(body) => builder.header(CONTENT_TYPE, JSON_MIME).body(body.clone()),
            None => builder.header(ACCEPT, JSON_MIME),
        };

        let transport = |source| Error::Transport {
            url: url.clone(),
            source,
        };
        let res = builder.send().map_err(transport)?;
        let status = res.status().as_u16();
        let body = res.text().map_err(transport)?;
        debug!(status, url = %url, "received response");

        if status != 200 {
            return Err(Error::Protocol { url, status, body });
        }
        Ok(body)
    }

    pub fn get_json(&self, path: &str) -> Result<Value> {
        let body = self.execute(&Request::get(path))?;
        serde_json::from_str(&body).map_err(|source| Error::Decode {
            url: self.url(path),
            source,
        })
    }

    pub fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<String> {
        self.send_json(Method::PUT, path, body)
    }

    pub fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<String> {
        self.send_json(Method::POST, path, body)
    }

    pub fn delete<T: Serialize>(&self, path: &str, body: &T) -> Result<String> {
        self.send_json(Method::DELETE, path, body)
    }

    fn send_json<T: Serialize>(&self, method: Method, path: &str, body: &T) -> Result<String> {
        let text = serde_json::to_string(body).map_err(|source| Error::Decode {
            url: self.url(path),
            source,
        })?;
        self.execute(&Request::with_body(method, path, text))
    }

    /// `GET /api/nac/users`, optionally filtered by MAC or IP.
    pub fn get_users(&self, filter: UserFilter<'_>) -> Result<Value> {
        self.get_json(&filter.path())
    }

    /// `PUT /api/nac/users`. The `ip` field comes from the config.
    pub fn change_user(
        &self,
        mac: &str,
        state: Option<UserState>,
        details: Option<&str>,
    ) -> Result<String> {
        let update = UserUpdate {
            mac: mac.to_string(),
            ip: self.config.change_user_ip,
            state,
            details: details.map(str::to_string),
        };
        self.put(USERS_PATH, &update)
    }

    pub fn get_logs(&self) -> Result<Value> {
        self.get_json(LOGS_PATH)
    }

    pub fn auth_guest(&self, ip: Option<Ipv4Addr>) -> Result<String> {
        self.put(USERS_AUTH_PATH, &AuthRequest::guest(ip))
    }

    pub fn auth_client(
        &self,
        ip: Option<Ipv4Addr>,
        username: &str,
        password: &str,
    ) -> Result<String> {
        self.put(USERS_AUTH_PATH, &AuthRequest::client(ip, username, password))
    }
}
