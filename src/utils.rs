use crate::tui;
use color_eyre::config::HookBuilder;
use color_eyre::{eyre, Result};
use directories::ProjectDirs;
use std::panic;
use std::path::PathBuf;

pub fn initialize_panic_handler() -> Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default().into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = tui::restore() {
            eprintln!("failed to restore terminal: {e}");
        }
        panic_hook(panic_info);
    }));
    Ok(())
}

pub fn get_config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| eyre::eyre!("failed to determine the config directory"))
}
