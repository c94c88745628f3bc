use std::path::Path;

use anyhow::bail;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::file_system::FileOperations;
use crate::file_system::FileSystemInteractor;

pub const REAL_FS: FileSystemInteractor = FileSystemInteractor { dry_run: false };

pub const DRY_FS: FileSystemInteractor = FileSystemInteractor { dry_run: true };

pub const NO_FOLDERS_FS: NoFoldersFilesystem = NoFoldersFilesystem {};

/// A real filesystem on which no folder can be created.
pub struct NoFoldersFilesystem;

impl FileOperations for NoFoldersFilesystem {
    fn read_bytes(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        REAL_FS.read_bytes(path)
    }

    fn read_utf8(&self, path: &Path) -> anyhow::Result<String> {
        REAL_FS.read_utf8(path)
    }

    fn try_read_toml<T: DeserializeOwned>(&self, path: &Path) -> anyhow::Result<T> {
        REAL_FS.try_read_toml(path)
    }

    fn try_write_toml<T: Serialize>(&self, path: &Path, data: &T) -> anyhow::Result<()> {
        REAL_FS.try_write_toml(path, data)
    }

    fn write_bytes_truncate(&self, path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
        REAL_FS.write_bytes_truncate(path, bytes)
    }

    fn write_utf8_truncate(&self, path: &Path, data: &str) -> anyhow::Result<()> {
        REAL_FS.write_utf8_truncate(path, data)
    }

    fn create_folder(&self, path: &Path) -> anyhow::Result<()> {
        bail!("Could not create {path:?}")
    }

    fn create_folder_all(&self, path: &Path) -> anyhow::Result<()> {
        bail!("Could not create {path:?}")
    }
}
