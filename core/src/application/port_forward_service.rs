//! Port forwarding application service.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{
    insert_or_merge, parse_port_mappings, parse_selectors, remove_mappings, ForwardTarget,
    LabelSelector,
};
use crate::error::{Error, Result};
use crate::ports::ConfigRepository;

/// Arguments of an add-port run.
#[derive(Debug, Clone, Default)]
pub struct AddPortRequest {
    pub namespace: String,
    /// `key=value,...`; empty means "resolve from config".
    pub label_selector: String,
    /// Name of a dev selector to bind the rule to.
    pub service: String,
    /// `local:remote,...`
    pub port_mappings: String,
}

/// Arguments of a remove-port run.
#[derive(Debug, Clone, Default)]
pub struct RemovePortRequest {
    pub all: bool,
    pub label_selector: String,
    /// Comma separated port numbers.
    pub ports: Option<String>,
}

/// One forwarded port, flattened out of its rule for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortForwardEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub namespace: String,
    pub local_port: i64,
    pub remote_port: i64,
}

/// Application service for editing port forwarding rules.
///
/// Operations edit the borrowed config in place and persist it through the
/// repository once they succeed. A failed save does not undo the in-memory
/// edit.
pub struct PortForwardService<R: ConfigRepository> {
    repository: R,
}

impl<R: ConfigRepository> PortForwardService<R> {
    /// Create a new service persisting through `repository`.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Add port mappings, merging into the rule with the same selector.
    pub async fn add_port(&self, config: &mut Config, request: &AddPortRequest) -> Result<()> {
        if !request.label_selector.is_empty() && !request.service.is_empty() {
            return Err(Error::Validation(
                "both service and label-selector specified. This is illegal because the \
                 label-selector is already specified in the referenced service. Therefore \
                 defining both is redundant"
                    .to_string(),
            ));
        }

        let selector = resolve_selector(config, &request.label_selector, &request.service)?;
        let mappings = parse_port_mappings(&request.port_mappings).map_err(Error::PortMappings)?;
        debug!(%selector, mappings = mappings.len(), "adding port mappings");

        insert_or_merge(
            &mut config.dev.ports,
            &request.namespace,
            selector,
            &request.service,
            mappings,
        );

        self.save(config).await
    }

    /// Remove port mappings by port number, or every rule with `all`.
    pub async fn remove_port(&self, config: &mut Config, request: &RemovePortRequest) -> Result<()> {
        let selector = parse_selectors(&request.label_selector).map_err(Error::Selectors)?;
        let ports = request.ports.as_deref().unwrap_or("");

        if selector.is_empty() && !request.all && ports.is_empty() {
            return Err(Error::Validation(
                "You have to specify at least one of the supported flags".to_string(),
            ));
        }

        if config.dev.ports.is_empty() {
            debug!("no port forwarding rules configured, nothing to remove");
            return Ok(());
        }

        let ports: Vec<&str> = ports.split(',').collect();
        let before = config.dev.ports.len();
        remove_mappings(&mut config.dev.ports, request.all, &ports);
        info!(
            rules_before = before,
            rules_after = config.dev.ports.len(),
            "removed port mappings"
        );

        self.save(config).await
    }

    /// List every forwarded port, in rule order.
    pub fn list_ports(&self, config: &Config) -> Vec<PortForwardEntry> {
        config
            .dev
            .ports
            .iter()
            .flat_map(|rule| {
                let (label_selector, service) = match &rule.target {
                    ForwardTarget::Selector(selector) => (Some(selector.clone()), None),
                    ForwardTarget::Service(name) => (None, Some(name.clone())),
                };
                rule.mappings.iter().map(move |m| PortForwardEntry {
                    label_selector: label_selector.clone(),
                    service: service.clone(),
                    namespace: rule.namespace.clone(),
                    local_port: m.local_port,
                    remote_port: m.remote_port,
                })
            })
            .collect()
    }

    async fn save(&self, config: &Config) -> Result<()> {
        self.repository
            .save(config)
            .await
            .map_err(|e| Error::Save(Box::new(e)))
    }
}

/// Work out the target selector for an add-port run.
///
/// An explicit selector wins. Otherwise the named (or first) dev selector is
/// used as-is, and without dev selectors the first Helm release is
/// targeted.
fn resolve_selector(config: &Config, label_selector: &str, service: &str) -> Result<LabelSelector> {
    if !label_selector.is_empty() {
        return parse_selectors(label_selector).map_err(Error::Selectors);
    }

    if let Some(first) = config.dev.selectors.first() {
        let selected = if service.is_empty() {
            first
        } else {
            config
                .selector_named(service)
                .ok_or_else(|| Error::ServiceNotFound(service.to_string()))?
        };
        return Ok(selected.label_selector.clone());
    }

    let release = format!("release={}", config.first_helm_deployment_name());
    parse_selectors(&release).map_err(Error::Selectors)
}
