use crate::config::ClientSettings;
use crate::constants::USER_AGENT;
use crate::error::{GrafanaError, Result};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

/// How requests authenticate against the Grafana API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    Basic { username: String, password: String },
    Bearer(String),
    Anonymous,
}

impl Auth {
    /// A non-empty username selects basic auth; otherwise a non-empty token
    /// selects a bearer header.
    pub fn from_credentials(username: String, password: String, api_token: String) -> Self {
        if !username.is_empty() {
            Auth::Basic { username, password }
        } else if !api_token.is_empty() {
            Auth::Bearer(api_token)
        } else {
            Auth::Anonymous
        }
    }
}

/// Raw outcome of a request that reached the server.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn ensure_ok(self) -> Result<Self> {
        if self.status == 200 {
            Ok(self)
        } else {
            Err(GrafanaError::Status {
                code: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Client for the Grafana REST API.
pub struct GrafanaClient {
    base_url: Url,
    auth: Auth,
    http: reqwest::Client,
}

impl GrafanaClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            GrafanaError::Config(format!("Invalid Grafana URL '{}': {}", settings.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GrafanaError::Config(format!(
                "Grafana URL '{}' cannot be used as a base URL",
                settings.base_url
            )));
        }
        if settings.auth == Auth::Anonymous {
            warn!("No username or API token configured, sending unauthenticated requests");
        }

        let http = reqwest::Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            base_url,
            auth: settings.auth,
            http,
        })
    }

    /// Joins `path` onto the base URL's path and encodes `params` as the query string.
    pub fn build_url(&self, path: &str, params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(None);
        url.set_fragment(None);

        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }

    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<ApiResponse> {
        self.request(Method::GET, path, params, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        params: &[(&str, String)],
        body: Vec<u8>,
    ) -> Result<ApiResponse> {
        self.request(Method::POST, path, params, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, &[], None).await
    }

    #[instrument(skip(self, params, body))]
    async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse> {
        let url = self.build_url(path, params);
        info!("Request: {} {}", method, url);

        let mut req = self.http.request(method, url);
        req = match &self.auth {
            Auth::Basic { username, password } => req.basic_auth(username, Some(password)),
            Auth::Bearer(token) => req.bearer_auth(token),
            Auth::Anonymous => req,
        };
        req = req
            .header(CACHE_CONTROL, "no-cache")
            .header(USER_AGENT_HEADER, USER_AGENT)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            req = req.body(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        debug!(status, bytes = body.len(), "Response received");

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str, auth: Auth) -> GrafanaClient {
        GrafanaClient::new(ClientSettings {
            base_url: base_url.to_string(),
            auth,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_auth_selection() {
        assert_eq!(
            Auth::from_credentials("admin".into(), "".into(), "tok".into()),
            Auth::Basic { username: "admin".into(), password: "".into() }
        );
        assert_eq!(
            Auth::from_credentials("".into(), "pw".into(), "tok".into()),
            Auth::Bearer("tok".into())
        );
        assert_eq!(
            Auth::from_credentials("".into(), "".into(), "".into()),
            Auth::Anonymous
        );
    }

    #[test]
    fn test_build_url_joins_paths() {
        let c = client("http://grafana.local:3000", Auth::Anonymous);
        assert_eq!(
            c.build_url("/api/folders", &[]).as_str(),
            "http://grafana.local:3000/api/folders"
        );

        let c = client("http://grafana.local/sub/path/", Auth::Anonymous);
        assert_eq!(
            c.build_url("/api/search", &[]).as_str(),
            "http://grafana.local/sub/path/api/search"
        );
    }

    #[test]
    fn test_build_url_query_only_when_params() {
        let c = client("http://grafana.local?orgId=1", Auth::Anonymous);
        assert_eq!(c.build_url("api/search", &[]).query(), None);

        let url = c.build_url(
            "api/search",
            &[("query", "cpu load".to_string()), ("type", "dash-db".to_string())],
        );
        assert_eq!(url.query(), Some("query=cpu+load&type=dash-db"));
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let result = GrafanaClient::new(ClientSettings {
            base_url: "not a url".into(),
            auth: Auth::Anonymous,
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(GrafanaError::Config(_))));
    }

    #[test]
    fn test_ensure_ok_maps_status() {
        let resp = ApiResponse { status: 404, body: b"{\"message\":\"not found\"}".to_vec() };
        match resp.ensure_ok() {
            Err(GrafanaError::Status { code, body }) => {
                assert_eq!(code, 404);
                assert!(body.contains("not found"));
            }
            other => panic!("unexpected: {:?}", other.map(|r| r.status)),
        }
    }

    #[tokio::test]
    async fn test_get_sends_bearer_and_json_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/folders"))
            .and(header("authorization", "Bearer secret-token"))
            .and(header("user-agent", "grafana-tool"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(header("cache-control", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server.uri(), Auth::Bearer("secret-token".into()));
        let resp = c.get("/api/folders", &[]).await.unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, b"[]");
    }

    #[tokio::test]
    async fn test_get_sends_basic_auth() {
        let server = MockServer::start().await;
        // base64("admin:secret")
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
            .and(query_param("type", "dash-db"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(
            &server.uri(),
            Auth::Basic { username: "admin".into(), password: "secret".into() },
        );
        let resp = c.get("/api/search", &[("type", "dash-db".to_string())]).await.unwrap();
        assert_eq!(resp.status, 200);
    }

    #[tokio::test]
    async fn test_anonymous_sends_no_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let c = client(&server.uri(), Auth::Anonymous);
        c.get("/api/health", &[]).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_post_and_delete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/folders"))
            .and(body_string("{\"title\":\"Ops\"}"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\":7}"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/dashboards/uid/abc"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server.uri(), Auth::Bearer("t".into()));
        let created = c
            .post("/api/folders", &[], b"{\"title\":\"Ops\"}".to_vec())
            .await
            .unwrap();
        let value: serde_json::Value = created.json().unwrap();
        assert_eq!(value["id"], 7);

        let deleted = c.delete("/api/dashboards/uid/abc").await.unwrap();
        assert_eq!(deleted.status, 404);
        assert!(deleted.ensure_ok().is_err());
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 9 of the loopback interface
        let c = client("http://127.0.0.1:9", Auth::Anonymous);
        let err = c.get("/api/folders", &[]).await.unwrap_err();
        assert!(matches!(err, GrafanaError::Http(_)));
    }
}
