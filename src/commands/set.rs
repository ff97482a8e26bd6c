use super::{confirm, probe_spinner};
use anyhow::{Result, bail};
use happy_server_settings::happy::{
    KeyValueStore, Prober, ServerConfig, SettingsScreen, validate_syntax,
};
use log::{debug, info};

/// Entry point for `happy-server-settings set <URL>`.
pub async fn run<S: KeyValueStore>(config: ServerConfig<S>, url: String, yes: bool) -> Result<()> {
    let mut screen = SettingsScreen::new(config);
    let prober = Prober::new()?;

    if let Err(e) = validate_syntax(&url) {
        debug!("Rejected {:?}: {}", url, e);
        return Err(e.into());
    }

    let Some(request) = screen.submit(url) else {
        match screen.error() {
            Some(kind) => bail!("{}", kind),
            None => bail!("Server settings are busy"),
        }
    };

    let spinner = probe_spinner(request.url())?;
    let outcome = prober.probe(request.url()).await;
    spinner.finish_and_clear();
    let detail = outcome.as_ref().err().map(ToString::to_string);
    screen.probe_finished(request, outcome);

    if let Some(kind) = screen.error() {
        match detail {
            Some(detail) => bail!(detail),
            None => bail!("{}", kind),
        }
    }

    let confirmed = yes
        || confirm("The app will use this server from now on. Continue with the new server?")?;
    if !confirmed {
        screen.decline();
        println!("Server unchanged");
        return Ok(());
    }

    screen.confirm()?;
    info!("Server changed");
    println!("Now using {}", screen.config().effective_url());
    Ok(())
}
