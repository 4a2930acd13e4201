//! Named parameter profiles persisted as a JSON file
//!
//! The whole store is rewritten after every mutation: the new contents go to a
//! sibling `.tmp` file that is then renamed over the store, so an interrupted write
//! leaves the previous store readable. Profiles are kept in a sorted map so listing
//! order is stable.

use crate::io::error::{MosaicError, Result};
use crate::io::parameters::MosaicParameters;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Profile name to parameter record store backed by one file
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    profiles: BTreeMap<String, MosaicParameters>,
}

impl SettingsStore {
    /// Open the store at `path`; a missing file is an empty store
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            log::debug!("No settings file at {}, starting empty", path.display());
            return Ok(Self {
                path,
                profiles: BTreeMap::new(),
            });
        }

        let file = File::open(&path).map_err(|e| MosaicError::FileSystem {
            path: path.clone(),
            operation: "open settings",
            source: e,
        })?;
        let profiles = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            MosaicError::Settings {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { path, profiles })
    }

    /// File backing the store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or overwrite a profile and persist the store
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    pub fn save(&mut self, profile: &str, parameters: &MosaicParameters) -> Result<()> {
        self.profiles
            .insert(profile.to_string(), parameters.clone());
        self.persist()?;
        log::info!("Saved profile '{profile}' to {}", self.path.display());
        Ok(())
    }

    /// Parameters stored under `profile`
    ///
    /// # Errors
    ///
    /// Returns an error if no such profile exists
    pub fn load(&self, profile: &str) -> Result<MosaicParameters> {
        self.profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| MosaicError::ProfileNotFound {
                profile: profile.to_string(),
            })
    }

    /// Remove a profile, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    pub fn delete(&mut self, profile: &str) -> Result<bool> {
        let existed = self.profiles.remove(profile).is_some();
        if existed {
            self.persist()?;
            log::info!("Deleted profile '{profile}'");
        }
        Ok(existed)
    }

    /// Names of all stored profiles, sorted
    pub fn list(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let temp_path = self.temp_path();
        if let Err(error) = self.write_profiles(&temp_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(error);
        }

        std::fs::rename(&temp_path, &self.path).map_err(|e| MosaicError::FileSystem {
            path: self.path.clone(),
            operation: "replace settings",
            source: e,
        })
    }

    /// Sibling file the store is written to before it replaces the real one
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_profiles(&self, path: &Path) -> Result<()> {
        let write_error = |e| MosaicError::FileSystem {
            path: path.to_path_buf(),
            operation: "write settings",
            source: e,
        };
        let file = File::create(path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.profiles).map_err(|e| {
            MosaicError::Settings {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;
        writer.flush().map_err(write_error)?;
        writer
            .into_inner()
            .map_err(|e| write_error(e.into_error()))?
            .sync_all()
            .map_err(write_error)
    }
}
