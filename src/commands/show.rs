use anyhow::Result;
use happy_server_settings::happy::{KeyValueStore, ResolvedServerInfo, ServerConfig};
use serde::Serialize;

#[derive(Serialize)]
struct ShowOutput<'a> {
    url: &'a str,
    #[serde(flatten)]
    info: &'a ResolvedServerInfo,
}

/// Entry point for `happy-server-settings show`.
pub fn run<S: KeyValueStore>(config: &ServerConfig<S>, json: bool) -> Result<()> {
    let url = config.effective_url();
    let info = config.resolved_info();

    if json {
        let output = ShowOutput { url: &url, info: &info };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Server:   {}", url);
    println!("Hostname: {}", info.hostname);
    if let Some(port) = info.port {
        println!("Port:     {}", port);
    }
    if info.is_custom {
        println!("Currently using a custom server");
    } else {
        println!("Using the default server");
    }
    Ok(())
}
