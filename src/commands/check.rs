use super::probe_spinner;
use anyhow::Result;
use happy_server_settings::happy::{KeyValueStore, Prober, ServerConfig, validate_syntax};
use log::info;

/// Entry point for `happy-server-settings check [URL]`.
pub async fn run<S: KeyValueStore>(config: &ServerConfig<S>, url: Option<String>) -> Result<()> {
    let url = url.unwrap_or_else(|| config.effective_url());

    validate_syntax(&url)?;

    let url = url.trim();
    let prober = Prober::new()?;
    let spinner = probe_spinner(url)?;
    let outcome = prober.probe(url).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(()) => {
            info!("Check of {} passed", url);
            println!("{} is a compatible Happy Server", url);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
