use super::confirm;
use anyhow::Result;
use happy_server_settings::happy::{KeyValueStore, ServerConfig, SettingsScreen};

/// Entry point for `happy-server-settings reset`.
pub fn run<S: KeyValueStore>(config: ServerConfig<S>, yes: bool) -> Result<()> {
    let mut screen = SettingsScreen::new(config);
    if !screen.is_using_custom_server() {
        println!("Already using the default server");
        return Ok(());
    }

    screen.request_reset();
    let confirmed = yes || confirm("Reset the server to the default?")?;
    if !confirmed {
        screen.decline();
        println!("Server unchanged");
        return Ok(());
    }

    screen.confirm()?;
    println!("Now using {}", screen.config().effective_url());
    Ok(())
}
