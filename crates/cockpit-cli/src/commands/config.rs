//! `cockpit config` — Inspect the effective configuration.

use cockpit_core::config::CockpitConfig;

pub fn show(config: &CockpitConfig) -> Result<(), String> {
    print!("{}", render(config)?);
    Ok(())
}

pub fn links(config: &CockpitConfig) -> Result<(), String> {
    for (i, link) in config.internal_links.iter().enumerate() {
        println!("{:>2}. {}", i + 1, link);
    }
    Ok(())
}

fn render(config: &CockpitConfig) -> Result<String, String> {
    serde_yaml::to_string(&config.redacted())
        .map_err(|e| format!("Failed to serialize config: {}", e))
}
