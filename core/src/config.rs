//! Dev configuration model and its file-backed store.
//!
//! Stores configuration in JSON format at `~/.devport/config.json` unless a
//! path is given. Keys this crate does not model are kept and written back
//! unchanged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::domain::{ForwardingRule, LabelSelector};
use crate::error::{Error, Result};
use crate::ports::ConfigRepository;

/// Fallback release name when no Helm deployment is configured.
pub const DEFAULT_RELEASE_NAME: &str = "devspace";

/// Configuration data stored in JSON format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Deployments of the project, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployments: Vec<DeploymentConfig>,

    /// Development settings, including port forwarding.
    #[serde(default)]
    pub dev: DevConfig,

    /// Settings not handled by devport.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Config {
    /// Name of the first deployment that is deployed with Helm.
    ///
    /// Falls back to [`DEFAULT_RELEASE_NAME`].
    pub fn first_helm_deployment_name(&self) -> &str {
        self.deployments
            .iter()
            .filter(|d| d.helm.is_some())
            .find_map(|d| d.name.as_deref())
            .unwrap_or(DEFAULT_RELEASE_NAME)
    }

    /// Look up a dev selector by name.
    pub fn selector_named(&self, name: &str) -> Option<&SelectorConfig> {
        self.dev.selectors.iter().find(|s| s.name == name)
    }
}

/// The `dev` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevConfig {
    /// Port forwarding rules.
    #[serde(default)]
    pub ports: Vec<ForwardingRule>,

    /// Named label selectors ("services") available to other dev settings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<SelectorConfig>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A named label selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default)]
    pub label_selector: LabelSelector,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A deployment entry. Only what port forwarding needs is modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm: Option<HelmConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubectl: Option<KubectlConfig>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Marks a Helm deployment. Its settings are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelmConfig {
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubectlConfig {
    #[serde(default)]
    pub manifests: Vec<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Configuration store backed by a JSON file.
///
/// Handles reading and writing configuration to `~/.devport/config.json`.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.devport/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        let config_path = home.join(".devport").join("config.json");

        Ok(Self { config_path })
    }

    /// Create a config store with a custom path.
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Returns the config file path.
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub async fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "config file missing, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub async fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        // Write atomically by writing to temp file then renaming
        let temp_path = self.config_path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to create temp config file: {}", e)))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        file.sync_all()
            .await
            .map_err(|e| Error::Config(format!("Failed to sync config: {}", e)))?;

        fs::rename(&temp_path, &self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to rename config file: {}", e)))?;

        info!(path = %self.config_path.display(), "saved config");
        Ok(())
    }
}

impl ConfigRepository for ConfigStore {
    async fn load(&self) -> Result<Config> {
        ConfigStore::load(self).await
    }

    async fn save(&self, config: &Config) -> Result<()> {
        ConfigStore::save(self, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForwardTarget, PortMapping};
    use tempfile::tempdir;

    fn test_store() -> (ConfigStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        (ConfigStore::with_path(path), dir)
    }

    #[tokio::test]
    async fn test_load_nonexistent() {
        let (store, _dir) = test_store();
        let config = store.load().await.unwrap();
        assert!(config.dev.ports.is_empty());
        assert!(config.deployments.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (store, _dir) = test_store();

        let mut config = Config::default();
        config.dev.ports.push(ForwardingRule::new(
            ForwardTarget::Selector(LabelSelector::new().with("app", "web")),
            "dev",
            vec![PortMapping::new(8080, 80)],
        ));
        config.dev.ports.push(ForwardingRule::new(
            ForwardTarget::Service("db".to_string()),
            "",
            vec![PortMapping::same(5432)],
        ));

        store.save(&config).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, config);
        assert!(!store.config_path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join("nested").join("config.json"));

        store.save(&Config::default()).await.unwrap();
        assert!(store.config_path().exists());
    }

    #[tokio::test]
    async fn test_unknown_keys_preserved() {
        let (store, _dir) = test_store();
        let raw = r#"{
            "version": "v1beta1",
            "deployments": [
                {"name": "shop", "helm": {"chartPath": "./chart", "wait": true}},
                {"name": "api", "namespace": "prod", "component": {"replicas": 2},
                 "kubectl": {"manifests": ["kube/*"], "kustomize": true}}
            ],
            "dev": {
                "sync": [{"localSubPath": "./src"}],
                "selectors": [{"name": "web", "labelSelector": {"app": "web"}, "containerName": "main"}],
                "ports": [{
                    "labelSelector": {"app": "web"},
                    "forwardTimeout": 30,
                    "portMappings": [{"localPort": 8080, "remotePort": 80, "bindAddress": "0.0.0.0"}]
                }]
            }
        }"#;
        std::fs::write(store.config_path(), raw).unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(config.other.get("version"), Some(&Value::from("v1beta1")));
        assert!(config.dev.other.contains_key("sync"));

        store.save(&config).await.unwrap();
        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(store.config_path()).unwrap()).unwrap();
        assert_eq!(saved["version"], "v1beta1");
        assert_eq!(saved["dev"]["sync"][0]["localSubPath"], "./src");
        assert_eq!(saved["deployments"][0]["helm"]["chartPath"], "./chart");
        assert_eq!(saved["deployments"][0]["helm"]["wait"], true);
        assert_eq!(saved["deployments"][1]["namespace"], "prod");
        assert_eq!(saved["deployments"][1]["component"]["replicas"], 2);
        assert_eq!(saved["deployments"][1]["kubectl"]["kustomize"], true);
        assert_eq!(saved["dev"]["selectors"][0]["containerName"], "main");
        assert_eq!(saved["dev"]["ports"][0]["forwardTimeout"], 30);
        assert_eq!(saved["dev"]["ports"][0]["portMappings"][0]["bindAddress"], "0.0.0.0");
    }

    #[tokio::test]
    async fn test_load_rejects_conflicting_rule() {
        let (store, _dir) = test_store();
        let raw = r#"{"dev": {"ports": [
            {"labelSelector": {"app": "web"}, "service": "web", "portMappings": []}
        ]}}"#;
        std::fs::write(store.config_path(), raw).unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_first_helm_deployment_name() {
        let mut config = Config::default();
        assert_eq!(config.first_helm_deployment_name(), "devspace");

        config.deployments = vec![
            DeploymentConfig {
                name: Some("manifests".to_string()),
                kubectl: Some(KubectlConfig::default()),
                ..Default::default()
            },
            DeploymentConfig {
                name: None,
                helm: Some(HelmConfig::default()),
                ..Default::default()
            },
            DeploymentConfig {
                name: Some("shop".to_string()),
                helm: Some(HelmConfig::default()),
                ..Default::default()
            },
        ];
        assert_eq!(config.first_helm_deployment_name(), "shop");
    }
}
