//! nsconf.toml configuration parser.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Group a user must hold to reach the namespace pages.
pub const DEFAULT_REQUIRED_GROUP: &str = "/cicd_dev";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub oidc: OidcConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub prefs: PrefsConfig,
}

/// OpenID Connect client settings handed to the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OidcConfig {
    pub authority: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub post_logout_redirect_uri: String,
    pub response_type: String,
    pub scope: String,
    pub automatic_silent_renew: bool,
    pub load_user_info: bool,
    pub monitor_session: bool,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            authority: "http://localhost:8181/realms/master/".to_string(),
            client_id: "my-react-app".to_string(),
            redirect_uri: "http://localhost:5173/".to_string(),
            post_logout_redirect_uri: "http://localhost:5173/".to_string(),
            response_type: "code".to_string(),
            scope: "openid profile email".to_string(),
            automatic_silent_renew: true,
            load_user_info: false,
            monitor_session: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub required_group: String,
    /// Profile claim that carries group membership.
    pub groups_claim: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            required_group: DEFAULT_REQUIRED_GROUP.to_string(),
            groups_claim: "groups".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Mock,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// JSON file with a top-level `namespaces` array (file sources only).
    pub path: Option<PathBuf>,
    /// Simulated latency of the list call, in milliseconds (mock only).
    pub list_latency_ms: u64,
    /// Simulated latency of the fetch call, in milliseconds (mock only).
    pub fetch_latency_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Mock,
            path: None,
            list_latency_ms: 300,
            fetch_latency_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefsConfig {
    /// Preferences file. Defaults to `$HOME/.nsconf/prefs.json`.
    pub path: Option<PathBuf>,
}

impl PrefsConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
            home.join(".nsconf").join("prefs.json")
        })
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a config that reads namespaces from a JSON file.
    pub fn scaffold(data_file: &str) -> Self {
        AppConfig {
            source: SourceConfig {
                kind: SourceKind::File,
                path: Some(PathBuf::from(data_file)),
                ..SourceConfig::default()
            },
            ..AppConfig::default()
        }
    }

    /// Apply `NSCONF_*` overrides, looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let oidc = &mut self.oidc;
        for (key, slot) in [
            ("NSCONF_OIDC_AUTHORITY", &mut oidc.authority),
            ("NSCONF_OIDC_CLIENT_ID", &mut oidc.client_id),
            ("NSCONF_OIDC_REDIRECT_URI", &mut oidc.redirect_uri),
            ("NSCONF_OIDC_POST_LOGOUT_REDIRECT_URI", &mut oidc.post_logout_redirect_uri),
            ("NSCONF_REQUIRED_GROUP", &mut self.access.required_group),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
        if let Some(path) = lookup("NSCONF_DATA_FILE").filter(|v| !v.is_empty()) {
            self.source.kind = SourceKind::File;
            self.source.path = Some(PathBuf::from(path));
        }
    }
}
