use std::{fs::create_dir_all, path::PathBuf};

use xdg::BaseDirectories;

use crate::{Error, Result};

/// Returns the path to the Helden configuration directory. If it doesn't exist when this
/// function is called, it will be created.
pub fn config_dir() -> Result<PathBuf> {
    let path = xdg_prefix().get_config_home().ok_or(Error::NoHomeDir)?;

    create_dir_all(&path)?;

    Ok(path)
}

fn xdg_prefix() -> BaseDirectories {
    xdg::BaseDirectories::with_prefix("helden")
}
