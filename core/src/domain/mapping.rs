//! Port mapping domain model and parser.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;

/// A single forwarded port: traffic to `local_port` on this machine goes to
/// `remote_port` on the target.
///
/// Ports are plain integers; range checks are left to whatever starts the
/// forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub local_port: i64,
    pub remote_port: i64,

    /// Per-mapping settings not handled by devport (e.g. `bindAddress`).
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl PortMapping {
    pub fn new(local_port: i64, remote_port: i64) -> Self {
        Self {
            local_port,
            remote_port,
            other: Map::new(),
        }
    }

    /// Forward a port to the same port number on the target.
    pub fn same(port: i64) -> Self {
        Self::new(port, port)
    }
}

impl std::fmt::Display for PortMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.local_port, self.remote_port)
    }
}

/// Parse `local:remote,local2:remote2`. A bare `port` maps to itself.
///
/// Order is kept as given; duplicates are not removed.
pub fn parse_port_mappings(text: &str) -> Result<Vec<PortMapping>, ParseError> {
    text.split(',')
        .map(|segment| {
            let parts: Vec<&str> = segment.split(':').collect();
            match parts.as_slice() {
                [port] => Ok(PortMapping::same(parse_port(port)?)),
                [local, remote] => Ok(PortMapping::new(parse_port(local)?, parse_port(remote)?)),
                _ => Err(ParseError::MalformedPortMapping(segment.to_string())),
            }
        })
        .collect()
}

fn parse_port(text: &str) -> Result<i64, ParseError> {
    text.parse().map_err(|source| ParseError::InvalidPort {
        text: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_port_maps_to_itself() {
        assert_eq!(parse_port_mappings("80").unwrap(), vec![PortMapping::same(80)]);
    }

    #[test]
    fn test_local_remote_pair() {
        assert_eq!(
            parse_port_mappings("80:8080").unwrap(),
            vec![PortMapping::new(80, 8080)]
        );
    }

    #[test]
    fn test_multiple_keep_order() {
        let mappings = parse_port_mappings("80:8080,443:8443,3000").unwrap();
        assert_eq!(
            mappings,
            vec![
                PortMapping::new(80, 8080),
                PortMapping::new(443, 8443),
                PortMapping::same(3000),
            ]
        );
    }

    #[test]
    fn test_duplicates_kept() {
        let mappings = parse_port_mappings("80,80").unwrap();
        assert_eq!(mappings.len(), 2);
    }

    #[test]
    fn test_too_many_parts() {
        assert_eq!(
            parse_port_mappings("80:8080:x"),
            Err(ParseError::MalformedPortMapping("80:8080:x".to_string()))
        );
    }

    #[test]
    fn test_non_integer_port() {
        let err = parse_port_mappings("80:http").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPort { ref text, .. } if text == "http"));

        assert!(parse_port_mappings("").is_err());
        assert!(parse_port_mappings("80,").is_err());
    }

    #[test]
    fn test_any_integer_accepted() {
        assert_eq!(parse_port_mappings("70000").unwrap(), vec![PortMapping::same(70000)]);
        assert_eq!(
            parse_port_mappings("-1:0").unwrap(),
            vec![PortMapping::new(-1, 0)]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(PortMapping::new(80, 8080).to_string(), "80:8080");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&PortMapping::new(80, 8080)).unwrap();
        assert_eq!(json, r#"{"localPort":80,"remotePort":8080}"#);
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let json = r#"{"localPort":80,"remotePort":8080,"bindAddress":"0.0.0.0"}"#;
        let mapping: PortMapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping.other.get("bindAddress"), Some(&Value::from("0.0.0.0")));
        assert_eq!(serde_json::to_string(&mapping).unwrap(), json);
    }
}
