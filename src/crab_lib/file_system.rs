use std::fs;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use log::debug;
use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ctx;

/// Interactor with the actual physical file system.
#[derive(Clone, Copy, Debug)]
pub struct FileSystemInteractor {
    /// If true this will not write nor store any state to the file system.
    pub dry_run: bool,
}

/// This defines all interactions of crab with the filesystem.
pub trait FileOperations {
    /// Read a file into raw bytes.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// Read a file into a utf8 string.
    fn read_utf8(&self, path: &Path) -> Result<String>;

    /// Try to deserialize a toml file into a struture `T`.
    fn try_read_toml<T: DeserializeOwned>(&self, path: &Path) -> Result<T>;

    /// Try to serialize a struct `T` into a toml file.
    fn try_write_toml<T: Serialize>(&self, path: &Path, data: &T) -> Result<()>;

    /// Write all bytes to a file.
    fn write_bytes_truncate(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// Write a [String] to a file.
    fn write_utf8_truncate(&self, path: &Path, data: &str) -> Result<()>;

    /// Create a single folder, failing if it already exists or if its
    /// parent does not.
    fn create_folder(&self, path: &Path) -> Result<()>;

    /// Create a folder and all of its missing parents.
    fn create_folder_all(&self, path: &Path) -> Result<()>;
}

impl FileOperations for FileSystemInteractor {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(ctx!(
          "Could not read the file {path:?}", ;
          "Ensure that the file exists and you have permissions to access it",
        ))
    }

    fn read_utf8(&self, path: &Path) -> Result<String> {
        String::from_utf8(self.read_bytes(path)?).with_context(ctx!(
          "{path:?} is not valid UTF-8", ;
          "The file doesn't seem to be human readable?",
        ))
    }

    fn try_read_toml<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        toml::from_str::<T>(&self.read_utf8(path)?).with_context(ctx!(
          "Could not deserialize toml file {path:?}", ;
          "Ensure that the file is valid toml",
        ))
    }

    fn try_write_toml<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        self.write_utf8_truncate(
            path,
            &toml::to_string::<T>(data).with_context(ctx!(
              "Could not serialize toml file {path:?}", ;
              "Ensure that the struct is valid toml",
            ))?,
        )
    }

    fn write_utf8_truncate(&self, path: &Path, data: &str) -> Result<()> {
        self.write_bytes_truncate(path, data.as_bytes())
    }

    fn write_bytes_truncate(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if self.dry_run {
            debug!("Would have written to {path:?} (dry)");
            return Ok(());
        }

        trace!("Writing {} bytes to {path:?}", bytes.len());
        fs::write(path, bytes).with_context(ctx!(
          "Could not write to the file {path:?}", ;
          "Ensure that its folder exists and you have permissions to write it",
        ))
    }

    fn create_folder(&self, path: &Path) -> Result<()> {
        if self.dry_run {
            debug!("Would have created the folder {path:?} (dry)");
            return Ok(());
        }

        debug!("Creating the folder {:?}", path);
        fs::create_dir(path).with_context(ctx!(
           "Could not create the folder {path:?}", ;
           "Ensure that its parent exists and you have sufficient permissions",
        ))
    }

    fn create_folder_all(&self, path: &Path) -> Result<()> {
        if self.dry_run {
            debug!("Would have created directories for {path:?} (dry)");
            return Ok(());
        }

        if !path.exists() {
            debug!("Creating directories for {:?}", path);
        }

        fs::create_dir_all(path).with_context(ctx!(
           "Could not create {path:?}", ;
           "Ensure that you have sufficient permissions",
        ))
    }
}

#[cfg(test)]
#[path = "tests/file_system.rs"]
mod tests;
