use crate::{
    cli::{Cli, Commands},
    commands,
};
use anyhow::Result;
use clap::Parser;
use env_logger::Builder;
use happy_server_settings::happy::{FileStore, STORE_NAMESPACE, ServerConfig};
use log::{LevelFilter, debug};
use std::io::Write;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_timestamp);

    let config_dir = cli.config_dir.clone().unwrap_or_else(FileStore::default_dir);
    let store = FileStore::new(&config_dir, STORE_NAMESPACE);
    debug!("Using server config store {:?}", store.path());

    let config = ServerConfig::new(store);
    if let Some(build_default) = config.build_default() {
        debug!("Build-time default server: {}", build_default);
    }

    match cli.command {
        Commands::Show { json } => commands::show::run(&config, json),
        Commands::Check { url } => commands::check::run(&config, url).await,
        Commands::Set { url, yes } => commands::set::run(config, url, yes).await,
        Commands::Reset { yes } => commands::reset::run(config, yes),
    }
}

/// Level names are matched case-insensitively; anything unknown means `info`.
fn parse_level(log_level: &str) -> LevelFilter {
    log_level.parse().unwrap_or(LevelFilter::Info)
}

fn init_logging(log_level: &str, log_timestamp: bool) {
    let mut builder = Builder::new();
    builder.filter_level(parse_level(log_level));
    builder.format(move |buf, record| {
        if log_timestamp {
            write!(buf, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        }
        writeln!(buf, "[{}] - {}", record.level(), record.args())
    });

    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels_parse() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }
}
