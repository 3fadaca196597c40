use chrono::Local;
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use taqvim::{Config, Database, Profile, cli::{Cli, Commands}, logging, utils};
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match &cli.config {
        Some(path) => Config::load_from_path(&utils::expand_path(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    let log_dir: Option<PathBuf> = utils::get_data_dir(profile);
    logging::init(&config.log_level, log_dir.as_deref());
    info!(version = env!("CARGO_PKG_VERSION"), ?profile, "starting taqvim");

    let db_path = config.get_database_path();
    let mut db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = taqvim::tui::App::new(config, db)?;
            taqvim::tui::run_event_loop(app)?;
        }
        command => {
            let today = Local::now().date_naive();
            let mut stdout = std::io::stdout().lock();
            taqvim::cli::run(command, &mut db, &config, today, &mut stdout)?;
        }
    }

    Ok(())
}
