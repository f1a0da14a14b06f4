use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use shelf_store::{Credential, GitHubConfig};
use shelf_types::Layout;
use shelf_upload::UploadConfig;

use crate::error::{ServerError, ServerResult};

/// Default request body limit, matching the 25 MB the upload form allows.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    pub store: GitHubConfig,
    pub layout: Layout,
    pub upload: UploadConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            store: GitHubConfig::default(),
            layout: Layout::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> ServerResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`.
    ///
    /// `SHELF_BIND` replaces the whole bind address; `PORT` replaces only the
    /// port. `REPO_OWNER`, `REPO_NAME` and `REPO_BRANCH` target the store. An
    /// empty `REPO_BRANCH` selects the repository default branch.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("SHELF_BIND") {
            self.bind_addr = bind
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("invalid SHELF_BIND {bind:?}: {e}")))?;
        }
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("invalid PORT {port:?}: {e}")))?;
            self.bind_addr.set_port(port);
        }
        if let Some(owner) = lookup("REPO_OWNER") {
            self.store.owner = owner.trim().to_string();
        }
        if let Some(repo) = lookup("REPO_NAME") {
            self.store.repo = repo.trim().to_string();
        }
        if let Some(branch) = lookup("REPO_BRANCH") {
            let branch = branch.trim();
            self.store.branch = (!branch.is_empty()).then(|| branch.to_string());
        }
        Ok(())
    }

    /// Fail early on settings that would make every upload fail.
    pub fn validate(&self) -> ServerResult<()> {
        if self.max_upload_bytes == 0 {
            return Err(ServerError::Config("max_upload_bytes must be positive".into()));
        }
        for product in shelf_types::ProductType::ALL {
            let layout = self.layout.for_product(product);
            if layout.catalog_path.trim().is_empty() || layout.variable_name.trim().is_empty() {
                return Err(ServerError::Config(format!(
                    "layout for {product} needs a catalog_path and variable_name"
                )));
            }
        }
        Ok(())
    }
}

/// The store credential from the process environment (`GITHUB_TOKEN`).
pub fn credential_from_env() -> Option<Credential> {
    credential_with(|key| std::env::var(key).ok())
}

/// The store credential from `lookup`, ignoring blank values.
pub fn credential_with<F>(lookup: F) -> Option<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("GITHUB_TOKEN")
        .map(Credential::new)
        .filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(c.store.api_base, "https://api.github.com");
        assert_eq!(c.layout, Layout::default());
        assert_eq!(c.upload.catalog_conflict_retries, 0);
        c.validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"

            [store]
            owner = "acme"
            repo = "remotes"
            branch = "catalog"

            [upload]
            catalog_conflict_retries = 2
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.store.owner, "acme");
        assert_eq!(c.store.branch.as_deref(), Some("catalog"));
        assert_eq!(c.store.timeout_secs, 30);
        assert_eq!(c.upload.catalog_conflict_retries, 2);
        assert_eq!(c.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn bad_toml_is_an_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::ConfigParse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_upload_bytes = 1024\n[store]\nowner = \"o\"\nrepo = \"r\"").unwrap();
        let c = ServerConfig::load(file.path()).unwrap();
        assert_eq!(c.max_upload_bytes, 1024);
        assert_eq!(c.store.repo, "r");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServerConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ServerError::Io(_)));
    }

    #[test]
    fn env_overrides() {
        let mut c = ServerConfig::default();
        c.apply_env_with(env(&[
            ("PORT", "7000"),
            ("REPO_OWNER", " acme "),
            ("REPO_NAME", "remotes"),
            ("REPO_BRANCH", "main"),
        ]))
        .unwrap();
        assert_eq!(c.bind_addr, "127.0.0.1:7000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.store.owner, "acme");
        assert_eq!(c.store.repo, "remotes");
        assert_eq!(c.store.branch.as_deref(), Some("main"));

        c.apply_env_with(env(&[("SHELF_BIND", "0.0.0.0:9000"), ("REPO_BRANCH", "")]))
            .unwrap();
        assert_eq!(c.bind_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.store.branch, None);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut c = ServerConfig::default();
        let err = c.apply_env_with(env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(m) if m.contains("PORT")));
    }

    #[test]
    fn credential_ignores_blank_token() {
        assert!(credential_with(env(&[])).is_none());
        assert!(credential_with(env(&[("GITHUB_TOKEN", "  ")])).is_none());
        let c = credential_with(env(&[("GITHUB_TOKEN", "ghp_abc")])).unwrap();
        assert_eq!(c.expose(), "ghp_abc");
    }

    #[test]
    fn zero_body_limit_is_invalid() {
        let c = ServerConfig {
            max_upload_bytes: 0,
            ..ServerConfig::default()
        };
        assert!(c.validate().is_err());
    }
}
