use crate::config::ClientConfig;
use crate::error::{PdnsError, Result};
use crate::powerdns::types::*;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const RESOURCE_SERVERS: &str = "servers";
const RESOURCE_ZONES: &str = "zones";
const RESOURCE_CONFIG: &str = "config";

/// Async client for the PowerDNS HTTP API.
///
/// Holds no mutable state; clones share the underlying connection pool.
/// Each call is a single attempt. Dropping the returned future aborts the
/// in-flight request.
#[derive(Clone)]
pub struct PowerDnsClient {
    http: Client,
    base_url: String, // e.g. "http://127.0.0.1:8081/api/v1"
    api_key: String,
}

impl PowerDnsClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // 3xx must reach the classifier instead of being followed
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let base_url = config.base_url();
        let http = builder
            .build()
            .map_err(|e| PdnsError::transport(&base_url, e))?;
        Ok(Self::with_http_client(http, config))
    }

    /// Build on top of an existing `reqwest::Client` (custom TLS, proxies, ...).
    pub fn with_http_client(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-API-Key", &self.api_key)
    }

    /// Joins `segments` onto the base URL verbatim.
    ///
    /// Segments are not percent-encoded: a zone or server name containing
    /// `/`, `?`, `#` or spaces yields a different URL than intended. Callers
    /// pass already-safe values (see [`crate::validation::validate_segment`]).
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    pub async fn list_servers(&self) -> Result<Vec<Server>> {
        let url = self.url(&[RESOURCE_SERVERS]);
        self.fetch(Method::GET, url).await
    }

    pub async fn get_server(&self, name: &str) -> Result<Server> {
        let url = self.url(&[RESOURCE_SERVERS, name]);
        self.fetch(Method::GET, url).await
    }

    /// Zones of `server` without their RRSets.
    pub async fn list_zones(&self, server: &str) -> Result<Vec<BasicZoneInfo>> {
        let url = self.url(&[RESOURCE_SERVERS, server, RESOURCE_ZONES]);
        self.fetch(Method::GET, url).await
    }

    pub async fn get_zone(&self, server: &str, zone: &str) -> Result<Zone> {
        let url = self.url(&[RESOURCE_SERVERS, server, RESOURCE_ZONES, zone]);
        self.fetch(Method::GET, url).await
    }

    /// PATCH `rrsets` into the zone. Each RRSet should carry a changetype
    /// (see [`RRSet::replace`] and [`RRSet::delete`]).
    pub async fn update_zone(&self, server: &str, zone: &str, rrsets: &[RRSet]) -> Result<()> {
        #[derive(Serialize)]
        struct PatchBody<'a> {
            rrsets: &'a [RRSet],
        }

        let url = self.url(&[RESOURCE_SERVERS, server, RESOURCE_ZONES, zone]);
        let body = PatchBody { rrsets };
        let _: serde_json::Value = self.send(Method::PATCH, url, Some(&body)).await?;
        Ok(())
    }

    pub async fn create_zone(&self, server: &str, zone: &ZoneCreate) -> Result<Zone> {
        let url = self.url(&[RESOURCE_SERVERS, server, RESOURCE_ZONES]);
        self.send(Method::POST, url, Some(zone)).await
    }

    pub async fn delete_zone(&self, server: &str, zone: &str) -> Result<()> {
        let url = self.url(&[RESOURCE_SERVERS, server, RESOURCE_ZONES, zone]);
        let _: serde_json::Value = self.fetch(Method::DELETE, url).await?;
        Ok(())
    }

    pub async fn list_config(&self, server: &str) -> Result<Vec<Config>> {
        let url = self.url(&[RESOURCE_SERVERS, server, RESOURCE_CONFIG]);
        self.fetch(Method::GET, url).await
    }

    async fn fetch<T>(&self, method: Method, url: String) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.send::<(), T>(method, url, None).await
    }

    async fn send<B, T>(&self, method: Method, url: String, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        debug!(%method, %url, "PowerDNS request");

        let mut req = self.auth_header(self.http.request(method, &url));
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req
            .send()
            .await
            .map_err(|e| PdnsError::transport(&url, e))?;
        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .map_err(|e| PdnsError::transport(&url, e))?;
        debug!(status = status.as_u16(), %url, "PowerDNS response");

        Ok(classify_response::<T>(status, &url, &bytes)?.unwrap_or_default())
    }
}

/// Maps a response onto its outcome.
///
/// `Ok(None)` means 204 No Content: success without a body to decode.
pub(crate) fn classify_response<T: DeserializeOwned>(
    status: StatusCode,
    url: &str,
    body: &[u8],
) -> Result<Option<T>> {
    let decode_err = |source| PdnsError::Decode {
        url: url.to_string(),
        status: status.as_u16(),
        source,
    };

    match status {
        StatusCode::OK | StatusCode::CREATED => {
            serde_json::from_slice(body).map(Some).map_err(decode_err)
        }
        StatusCode::NO_CONTENT => Ok(None),
        StatusCode::BAD_REQUEST
        | StatusCode::UNPROCESSABLE_ENTITY
        | StatusCode::INTERNAL_SERVER_ERROR => {
            let error: ApiError = serde_json::from_slice(body).map_err(decode_err)?;
            warn!(status = status.as_u16(), %url, error = %error.error, "PowerDNS API error");
            Err(PdnsError::Api {
                status: status.as_u16(),
                error,
            })
        }
        StatusCode::NOT_FOUND => Err(PdnsError::NotFound {
            url: url.to_string(),
        }),
        _ => Err(PdnsError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        }),
    }
}
