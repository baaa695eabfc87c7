use crate::error::{ClientError, Result};
use directories::ProjectDirs;
use std::{env, path::PathBuf};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "Auralis", "auralis-client").ok_or(ClientError::StorageUnavailable)
}

pub fn config_file() -> Result<PathBuf> {
    config_file_with(|k| env::var(k).ok())
}

/// Like [`config_file`], reading `AURALIS_CONFIG` through `get`.
pub fn config_file_with(get: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(p) = get("AURALIS_CONFIG") {
        return Ok(PathBuf::from(p));
    }
    let proj = project_dirs()?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn data_dir() -> Result<PathBuf> {
    data_dir_with(|k| env::var(k).ok())
}

/// Like [`data_dir`], reading `AURALIS_DATA_DIR` through `get`.
pub fn data_dir_with(get: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(p) = get("AURALIS_DATA_DIR") {
        return Ok(PathBuf::from(p));
    }
    let proj = project_dirs()?;
    Ok(PathBuf::from(proj.data_dir()))
}
