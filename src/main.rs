use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod camera;
mod config;
mod error;
mod filesystem;
mod platform;
mod screens;
mod services;

use config::AppConfig;
use error::AppError;
use services::gallery_service;

#[derive(Parser, Debug)]
#[clap(
    name = "geocam",
    version = env!("CARGO_PKG_VERSION"),
    about = "Take geotagged photos and keep them in a local gallery"
)]
struct Cli {
    /// Config file (defaults to geocam.toml in the app data directory).
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Storage backend: 'sqlite' or 'blob'. Overrides the config file.
    #[clap(long, global = true)]
    backend: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take a picture (imports IMAGE) and save it with the current location
    Capture {
        image: PathBuf,
        /// Show the photo and its location, then drop it instead of saving
        #[clap(long)]
        discard: bool,
    },
    /// List every photo in the gallery
    List,
    /// Show a single photo
    Show { id: i64 },
    /// Delete a photo from the gallery
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[clap(short, long)]
        yes: bool,
    },
}

fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default().with_max_level(log::LevelFilter::Info),
    );

    #[cfg(not(target_os = "android"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

async fn dispatch(command: Command, config: &AppConfig) -> Result<(), AppError> {
    let mut out = std::io::stdout().lock();

    match command {
        Command::Capture { image, discard } => {
            let store = gallery_service::gallery()?;
            screens::camera::run(config, store, &image, discard, &mut out).await?;
        }
        Command::List => screens::gallery::list(&mut out).await?,
        Command::Show { id } => screens::gallery::show(id, &mut out).await?,
        Command::Delete { id, yes } => {
            let mut input = std::io::stdin().lock();
            screens::gallery::delete(id, yes, &mut input, &mut out).await?;
        }
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(backend) = cli.backend.as_deref() {
        config.backend = backend.parse()?;
    }

    gallery_service::open_gallery(&config.gallery_config()).await?;

    let result = dispatch(cli.command, &config).await;
    let closed = gallery_service::close_gallery().await;
    result.and(closed)
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
