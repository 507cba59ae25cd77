//! Add/remove port commands.

use anyhow::Result;
use devport_core::{AddPortRequest, ConfigStore, PortForwardService, RemovePortRequest};

pub async fn add(store: ConfigStore, request: AddPortRequest) -> Result<()> {
    let service = PortForwardService::new(store);
    let mut config = service.repository().load().await?;

    service.add_port(&mut config, &request).await?;

    println!("Successfully added port {}", request.port_mappings);
    Ok(())
}

pub async fn remove(store: ConfigStore, request: RemovePortRequest) -> Result<()> {
    let service = PortForwardService::new(store);
    let mut config = service.repository().load().await?;

    service.remove_port(&mut config, &request).await?;

    println!("Successfully removed port");
    Ok(())
}
