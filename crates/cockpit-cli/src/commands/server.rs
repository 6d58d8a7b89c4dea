//! `cockpit server` — Start the Cockpit HTTP backend server.

use cockpit_core::config::CockpitConfig;

pub async fn run(
    config: CockpitConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), String> {
    let mut server_config = cockpit_server::ServerConfig::from_cockpit_config(&config);
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    println!(
        "Starting Cockpit server on {}:{}...",
        server_config.host, server_config.port
    );

    let addr = cockpit_server::start_server(server_config, config).await?;
    println!("Cockpit server listening on http://{}", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
