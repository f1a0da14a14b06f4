//! HTTP client for a git-hosting "contents" API.
//!
//! Every file in the repository is read with
//! `GET {api}/repos/{owner}/{repo}/contents/{path}` (base64 content plus the
//! blob SHA) and written with `PUT` on the same URL. The blob SHA is the
//! version token: a `PUT` that replaces an existing file must carry it, and a
//! stale or missing SHA is answered with `409`/`422`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::blob::{validate_path, BlobRef, Version};
use crate::error::{StoreError, StoreResult};
use crate::retry::retry_send;
use crate::traits::ContentStore;

/// Longest response body excerpt kept in error messages.
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for the remote repository.
///
/// The access token is deliberately not part of this struct; it is passed as
/// a [`Credential`] when the client is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API root, e.g. `https://api.github.com`.
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    /// Branch to read and commit to. `None` means the repository default.
    pub branch: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".into(),
            owner: String::new(),
            repo: String::new(),
            branch: None,
            timeout_secs: 30,
            user_agent: concat!("remote-shelf/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Bearer token for the contents API. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutContentsResponse {
    content: PutContent,
}

#[derive(Deserialize)]
struct PutContent {
    sha: String,
}

/// [`ContentStore`] backed by a remote repository's contents API.
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct GitHubContentStore {
    client: reqwest::Client,
    repo_url: Url,
    branch: Option<String>,
    label: String,
}

impl GitHubContentStore {
    /// Build a client for `config`, authenticating with `credential`.
    pub fn new(config: &GitHubConfig, credential: Credential) -> StoreResult<Self> {
        if credential.is_empty() {
            return Err(StoreError::Config("access token must not be empty".into()));
        }
        if config.owner.trim().is_empty() || config.repo.trim().is_empty() {
            return Err(StoreError::Config("repository owner and name must be set".into()));
        }

        let mut repo_url = Url::parse(&config.api_base)
            .map_err(|e| StoreError::Config(format!("invalid api_base {:?}: {e}", config.api_base)))?;
        repo_url
            .path_segments_mut()
            .map_err(|_| StoreError::Config(format!("api_base {:?} cannot hold a path", config.api_base)))?
            .pop_if_empty()
            .extend(["repos", config.owner.trim(), config.repo.trim()]);

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
            .map_err(|_| StoreError::Config("access token contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| StoreError::Config("user_agent contains invalid characters".into()))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {e}")))?;

        let branch = config.branch.clone().filter(|b| !b.trim().is_empty());
        let label = match &branch {
            Some(b) => format!("github:{}/{}@{b}", config.owner.trim(), config.repo.trim()),
            None => format!("github:{}/{}", config.owner.trim(), config.repo.trim()),
        };

        Ok(Self {
            client,
            repo_url,
            branch,
            label,
        })
    }

    fn contents_url(&self, path: &str) -> StoreResult<Url> {
        validate_path(path)?;
        let mut url = self.repo_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Config("repository URL cannot hold a path".into()))?
            .push("contents")
            .extend(path.split('/'));
        Ok(url)
    }

    /// Turn a contents response into a [`BlobRef`].
    ///
    /// Files over the API's inline size limit come back with encoding
    /// `"none"` and no content. They yield a version-only ref with empty
    /// bytes: enough to replace the file, and never a valid catalog.
    fn decode(path: &str, body: ContentsResponse) -> StoreResult<BlobRef> {
        match body.encoding.as_deref() {
            None | Some("base64") => {}
            Some("none") => {
                tracing::warn!(path, "file too large to inline; content not fetched");
                return Ok(BlobRef {
                    path: path.to_string(),
                    bytes: Vec::new(),
                    version: Version::new(body.sha),
                });
            }
            Some(encoding) => {
                return Err(StoreError::Decode {
                    path: path.to_string(),
                    reason: format!("unsupported content encoding {encoding:?}"),
                });
            }
        }
        let packed: String = body.content.split_whitespace().collect();
        let bytes = BASE64.decode(packed).map_err(|e| StoreError::Decode {
            path: path.to_string(),
            reason: format!("invalid base64 content: {e}"),
        })?;
        Ok(BlobRef {
            path: path.to_string(),
            bytes,
            version: Version::new(body.sha),
        })
    }
}

async fn status_error(endpoint: String, resp: reqwest::Response) -> StoreError {
    let status = resp.status().as_u16();
    if matches!(status, 401 | 403) {
        return StoreError::Unauthorized { endpoint, status };
    }
    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        body.truncate(cut);
    }
    StoreError::Api {
        endpoint,
        status,
        body,
    }
}

#[async_trait]
impl ContentStore for GitHubContentStore {
    async fn read(&self, path: &str) -> StoreResult<Option<BlobRef>> {
        let url = self.contents_url(path)?;
        let endpoint = url.path().to_string();

        let resp = retry_send(|| {
            let mut req = self.client.get(url.clone());
            if let Some(branch) = &self.branch {
                req = req.query(&[("ref", branch.as_str())]);
            }
            req.send()
        })
        .await
        .map_err(|source| StoreError::Http {
            endpoint: endpoint.clone(),
            source,
        })?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                tracing::debug!(path, "store read: not found");
                Ok(None)
            }
            status if status.is_success() => {
                let body: ContentsResponse = resp.json().await.map_err(|e| StoreError::Decode {
                    path: path.to_string(),
                    reason: format!("unexpected response body: {e}"),
                })?;
                let blob = Self::decode(path, body)?;
                tracing::debug!(path, version = blob.version.short(), size = blob.bytes.len(), "store read");
                Ok(Some(blob))
            }
            _ => Err(status_error(endpoint, resp).await),
        }
    }

    async fn write(
        &self,
        path: &str,
        bytes: &[u8],
        expected: Option<&Version>,
        message: &str,
    ) -> StoreResult<Version> {
        let url = self.contents_url(path)?;
        let endpoint = url.path().to_string();
        let body = PutContentsRequest {
            message,
            content: BASE64.encode(bytes),
            sha: expected.map(Version::as_str),
            branch: self.branch.as_deref(),
        };

        let resp = self
            .client
            .put(url)
            .json(&body)
            .send()
            .await
            .map_err(|source| StoreError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if status == StatusCode::CONFLICT {
            return Err(StoreError::Conflict {
                path: path.to_string(),
                expected: expected.cloned(),
            });
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            // A missing or mismatched "sha" is reported as a validation error.
            let text = resp.text().await.unwrap_or_default();
            if text.contains("sha") {
                return Err(StoreError::Conflict {
                    path: path.to_string(),
                    expected: expected.cloned(),
                });
            }
            return Err(StoreError::Api {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }
        if !status.is_success() {
            return Err(status_error(endpoint, resp).await);
        }

        let body: PutContentsResponse = resp.json().await.map_err(|e| StoreError::Decode {
            path: path.to_string(),
            reason: format!("unexpected response body: {e}"),
        })?;
        let version = Version::new(body.content.sha);
        tracing::debug!(path, version = version.short(), "store write accepted");
        Ok(version)
    }

    async fn probe(&self) -> StoreResult<()> {
        let endpoint = self.repo_url.path().to_string();
        let resp = retry_send(|| self.client.get(self.repo_url.clone()).send())
            .await
            .map_err(|source| StoreError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(status_error(endpoint, resp).await)
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

impl fmt::Debug for GitHubContentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubContentStore")
            .field("repo_url", &self.repo_url.as_str())
            .field("branch", &self.branch)
            .finish()
    }
}
