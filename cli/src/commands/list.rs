//! List command - show all forwarded ports.

use anyhow::Result;
use devport_core::{ConfigStore, PortForwardEntry, PortForwardService};

pub async fn ports(store: ConfigStore, json: bool) -> Result<()> {
    let service = PortForwardService::new(store);
    let config = service.repository().load().await?;
    let entries = service.list_ports(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No ports are forwarded.");
        return Ok(());
    }

    // Table header
    println!(
        "{:<30} {:<15} {:<8} {:<8}",
        "TARGET", "NAMESPACE", "LOCAL", "REMOTE"
    );
    println!("{}", "-".repeat(64));

    for entry in &entries {
        let namespace = if entry.namespace.is_empty() {
            "-"
        } else {
            entry.namespace.as_str()
        };

        println!(
            "{:<30} {:<15} {:<8} {:<8}",
            truncate(&target(entry), 30),
            truncate(namespace, 15),
            entry.local_port,
            entry.remote_port
        );
    }

    println!("\nTotal: {} ports", entries.len());
    Ok(())
}

fn target(entry: &PortForwardEntry) -> String {
    match (&entry.service, &entry.label_selector) {
        (Some(service), _) => format!("service/{}", service),
        (None, Some(selector)) if !selector.is_empty() => selector.to_string(),
        _ => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{}…", head)
    }
}
