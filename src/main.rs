use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use monster_chase::{Error, Result, Settings, app};

/// Log file override, handy when no settings file exists
const LOG_ENV: &str = "MONSTER_CHASE_LOG";

// The game owns the screen, so logs go to a file or nowhere. RUST_LOG
// still wins when set.
fn init_logging(settings: &Settings) -> Result<()> {
    let path = settings
        .log_file
        .clone()
        .or_else(|| std::env::var_os(LOG_ENV).map(PathBuf::from));
    let default_filter = if path.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = path {
        let file = File::create(&path).map_err(|source| Error::LogFile { path, source })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn try_main() -> Result<()> {
    let config = Settings::path_from_env();
    let settings = Settings::load(&config)?;
    init_logging(&settings)?;
    log::info!("Monster Chase starting, settings from {}", config.display());
    log::debug!("{:?}", settings);
    app::run(&settings)
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("monster-chase: {e}");
            ExitCode::FAILURE
        }
    }
}
