//! Saves the freight sheet and market sort preference between sessions.

use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

use crate::domain::PersistedState;

const APP_QUALIFIER: &str = "in";
const APP_ORG: &str = "MandiDesk";
const APP_NAME: &str = "MandiDesk";
const STATE_FILENAME: &str = "state.json";

fn data_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(STATE_FILENAME))
}

pub fn load_persisted_state() -> Option<PersistedState> {
    let path = data_file()?;
    let data = fs::read_to_string(&path).ok()?;
    match decode_state(&data) {
        Ok(state) => {
            tracing::debug!(path = %path.display(), "restored persisted state");
            Some(state)
        }
        Err(e) => {
            tracing::warn!("ignoring unreadable persisted state: {e}");
            None
        }
    }
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    let path = data_file().ok_or(PersistSaveError::StorageUnavailable)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

fn decode_state(data: &str) -> Result<PersistedState, SerdeError> {
    serde_json::from_str::<PersistedState>(data).map(|state| PersistedState {
        freight: state.freight.normalized(),
        ..state
    })
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
