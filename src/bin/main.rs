use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::{env, fs};
use tuisplash::app::App;
use tuisplash::config::Config;
use tuisplash::utils::{get_config_dir, initialize_panic_handler};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// TUI Client for the Unsplash photo feed.
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Unsplash API access key.
    /// Overrides `access_key` in the configuration file.
    #[arg(short, long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,
    /// Number of photos requested per page (1-30).
    #[arg(short, long)]
    per_page: Option<u32>,
    /// Development mode
    #[arg(short, long)]
    dev: bool,
}

impl Args {
    fn config_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config {
            Ok(path.clone())
        } else {
            Self::default_config_path()
        }
    }
    fn default_config_path() -> Result<PathBuf> {
        let config_dir = get_config_dir()?;
        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("tuisplash.toml"))
    }
}

fn init_logger() {
    let mut builder = env_logger::Builder::from_default_env();
    if env::var("RUST_LOG").is_err() {
        builder.filter_level(log::LevelFilter::Off);
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path()?;
    let mut config = if config_path.exists() {
        toml::from_str(&fs::read_to_string(&config_path)?)?
    } else {
        Config::default()
    };
    config.set_default_keybindings();
    if let Some(access_key) = args.access_key {
        config.unsplash.access_key = Some(access_key);
    }
    if let Some(per_page) = args.per_page {
        config.unsplash.per_page = per_page;
    }
    config.dev |= args.dev;

    init_logger();

    initialize_panic_handler()?;

    App::new(config).run().await
}
