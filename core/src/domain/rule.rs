//! Forwarding rule domain model, rule merging and port removal.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::{LabelSelector, PortMapping};

// ============================================================================
// ForwardTarget
// ============================================================================

/// What a forwarding rule points at.
///
/// A rule bound to a service uses the service's own selector, so it never
/// carries one itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardTarget {
    /// Pods matching these labels.
    Selector(LabelSelector),
    /// A named dev selector / service.
    Service(String),
}

impl ForwardTarget {
    /// Whether this target's own selector is exactly `selector`.
    ///
    /// Service targets have an empty selector of their own.
    pub fn selector_equals(&self, selector: &LabelSelector) -> bool {
        match self {
            ForwardTarget::Selector(own) => own == selector,
            ForwardTarget::Service(_) => selector.is_empty(),
        }
    }
}

impl Default for ForwardTarget {
    fn default() -> Self {
        ForwardTarget::Selector(LabelSelector::new())
    }
}

impl std::fmt::Display for ForwardTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForwardTarget::Selector(selector) if selector.is_empty() => f.write_str("-"),
            ForwardTarget::Selector(selector) => write!(f, "{}", selector),
            ForwardTarget::Service(name) => write!(f, "service/{}", name),
        }
    }
}

// ============================================================================
// ForwardingRule
// ============================================================================

/// A persisted port-forwarding rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForwardingRuleJson", into = "ForwardingRuleJson")]
pub struct ForwardingRule {
    pub target: ForwardTarget,
    pub namespace: String,
    pub mappings: Vec<PortMapping>,
    /// Rule settings not handled by devport.
    pub other: Map<String, Value>,
}

impl ForwardingRule {
    pub fn new(target: ForwardTarget, namespace: impl Into<String>, mappings: Vec<PortMapping>) -> Self {
        Self {
            target,
            namespace: namespace.into(),
            mappings,
            other: Map::new(),
        }
    }
}

/// On-disk representation of a [`ForwardingRule`].
///
/// Devspace-style configs write `selector: ""` next to a label selector, so
/// an empty service name is read as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardingRuleJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<LabelSelector>,

    #[serde(default, alias = "selector", skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    #[serde(default)]
    pub port_mappings: Vec<PortMapping>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl From<ForwardingRule> for ForwardingRuleJson {
    fn from(rule: ForwardingRule) -> Self {
        let (label_selector, service) = match rule.target {
            ForwardTarget::Selector(selector) => (Some(selector), None),
            ForwardTarget::Service(name) => (None, Some(name)),
        };
        Self {
            label_selector,
            service,
            namespace: rule.namespace,
            port_mappings: rule.mappings,
            other: rule.other,
        }
    }
}

impl TryFrom<ForwardingRuleJson> for ForwardingRule {
    type Error = String;

    fn try_from(json: ForwardingRuleJson) -> std::result::Result<Self, Self::Error> {
        let service = json.service.filter(|name| !name.is_empty());
        let target = match (json.label_selector, service) {
            (Some(selector), Some(name)) if !selector.is_empty() => {
                return Err(format!(
                    "port rule sets both labelSelector ({}) and service ({}); only one is allowed",
                    selector, name
                ));
            }
            (_, Some(name)) => ForwardTarget::Service(name),
            (selector, None) => ForwardTarget::Selector(selector.unwrap_or_default()),
        };
        Ok(Self {
            target,
            namespace: json.namespace,
            mappings: json.port_mappings,
            other: json.other,
        })
    }
}

// ============================================================================
// Merging
// ============================================================================

/// Add `mappings` to the rule whose selector is exactly `selector`, or
/// append a new rule if none matches.
///
/// A matching rule keeps its own namespace and target. A new rule bound to
/// a non-empty `service` drops `selector`.
pub fn insert_or_merge(
    rules: &mut Vec<ForwardingRule>,
    namespace: &str,
    selector: LabelSelector,
    service: &str,
    mappings: Vec<PortMapping>,
) {
    if let Some(rule) = rules.iter_mut().find(|r| r.target.selector_equals(&selector)) {
        debug!(rule = %rule.target, added = mappings.len(), "merging into existing rule");
        rule.mappings.extend(mappings);
        return;
    }

    let target = if service.is_empty() {
        ForwardTarget::Selector(selector)
    } else {
        ForwardTarget::Service(service.to_string())
    };
    debug!(rule = %target, namespace, "creating new rule");
    rules.push(ForwardingRule::new(target, namespace, mappings));
}

// ============================================================================
// Removal
// ============================================================================

/// Drop port mappings whose local or remote port is listed in `ports`.
///
/// `ports` holds textual port tokens; surrounding whitespace is ignored.
/// With `remove_all` every rule goes. Rules left without mappings are
/// removed.
pub fn remove_mappings(rules: &mut Vec<ForwardingRule>, remove_all: bool, ports: &[&str]) {
    if remove_all {
        debug!(removed = rules.len(), "removing all rules");
        rules.clear();
        return;
    }

    rules.retain_mut(|rule| {
        rule.mappings
            .retain(|m| !contains_port(ports, m.local_port) && !contains_port(ports, m.remote_port));
        if rule.mappings.is_empty() {
            debug!(rule = %rule.target, "dropping rule without mappings");
            return false;
        }
        true
    });
}

fn contains_port(ports: &[&str], port: i64) -> bool {
    let port = port.to_string();
    ports.iter().any(|p| p.trim() == port)
}
