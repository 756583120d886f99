use crate::influx::{
    error::InfluxError,
    query::{ErrorBody, Query, Response},
};
use model::records::batch::BatchPoints;
use reqwest::{RequestBuilder, Url};
use std::time::Duration;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = concat!("pg2influx/", env!("CARGO_PKG_VERSION"));

/// Settings for the HTTP client.
#[derive(Clone, Default)]
pub struct HttpConfig {
    pub addr: String,
    pub username: String,
    pub password: String,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("addr", &self.addr)
            .field("username", &self.username)
            .field("password", &"***")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client for the InfluxDB 1.x HTTP API.
#[derive(Clone)]
pub struct InfluxClient {
    http: reqwest::Client,
    base: Url,
    username: Option<String>,
    password: String,
}

impl std::fmt::Debug for InfluxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxClient")
            .field("base", &self.base.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl InfluxClient {
    pub fn new(config: HttpConfig) -> Result<Self, InfluxError> {
        let base = Url::parse(&config.addr).map_err(|e| InfluxError::InvalidAddress {
            addr: config.addr.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(InfluxError::InvalidAddress {
                addr: config.addr.clone(),
                reason: format!("unsupported protocol scheme '{}'", base.scheme()),
            });
        }

        let user_agent = config
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(InfluxClient {
            http: builder.build()?,
            base,
            username: (!config.username.is_empty()).then_some(config.username),
            password: config.password,
        })
    }

    /// Runs a query and returns the decoded response.
    pub async fn query(&self, query: &Query) -> Result<Response, InfluxError> {
        debug!(command = %query.command, database = %query.database, "InfluxDB query");

        let request = self.http.get(self.endpoint("query")).query(&[
            ("q", query.command.as_str()),
            ("db", query.database.as_str()),
        ]);
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let decoded = match serde_json::from_slice::<Response>(&body) {
            Ok(decoded) => decoded,
            Err(_) if !status.is_success() => {
                return Err(InfluxError::Status {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).into_owned(),
                });
            }
            Err(err) => return Err(InfluxError::Decode(err)),
        };

        if let Some(message) = decoded.error() {
            return Err(InfluxError::Query(message.to_string()));
        }

        if !status.is_success() {
            return Err(InfluxError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(decoded)
    }

    /// Writes the whole batch in one request.
    pub async fn write(&self, batch: &BatchPoints) -> Result<(), InfluxError> {
        let body = batch.to_line_protocol()?;
        debug!(
            points = batch.len(),
            bytes = body.len(),
            database = batch.database(),
            "InfluxDB write"
        );

        let request = self
            .http
            .post(self.endpoint("write"))
            .query(&[
                ("db", batch.database()),
                ("precision", batch.precision().as_str()),
            ])
            .body(body);
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(InfluxError::WriteRejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Checks the server is reachable; returns the reported version if any.
    pub async fn ping(&self) -> Result<Option<String>, InfluxError> {
        let response = self.authorize(self.http.get(self.endpoint("ping"))).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InfluxError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response
            .headers()
            .get("X-Influxdb-Version")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string))
    }

    fn endpoint(&self, name: &str) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}/{name}", self.base.path().trim_end_matches('/'));
        url.set_path(&path);
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, Some(&self.password)),
            None => request,
        }
    }
}
