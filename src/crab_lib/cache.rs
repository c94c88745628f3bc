use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::CACHE_SCHEMA_VERSION;
use crate::ctx;
use crate::error::CrabError;
use crate::file_system::FileOperations;

/// How to reach the server for one task.
///
/// Written once when a work area is created or remade, and read back by
/// every later command that targets the task. It is never edited in place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct CacheRecord {
    /// The server host the task was submitted to.
    #[serde(rename = "Server")]
    pub server: String,

    /// The server port, empty when the default one is used.
    #[serde(rename = "Port")]
    pub port: String,

    /// The complete name of the request on the server.
    #[serde(rename = "RequestName")]
    pub request_name: String,

    /// The VOMS role used for the proxy.
    #[serde(rename = "voRole")]
    pub vo_role: String,

    /// The VOMS group used for the proxy.
    #[serde(rename = "voGroup")]
    pub vo_group: String,

    /// The server deployment, see [crate::constants::SERVICE_INSTANCES].
    pub instance: String,

    // kept last, toml emits tables after plain values
    /// The configuration the task was created from.
    #[serde(rename = "OriginalConfig", default)]
    pub original_config: toml::Table,
}

/// The on-disk layout of a `.requestcache` file.
#[derive(Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct CacheFile {
    /// Layout version, see [CACHE_SCHEMA_VERSION].
    version: u32,

    request: CacheRecord,
}

/// Serialize `record` to the cache file at `path`, replacing whatever was
/// there.
pub fn write(path: &Path, record: &CacheRecord, fs: &impl FileOperations) -> Result<()> {
    fs.try_write_toml(
        path,
        &CacheFile {
            version: CACHE_SCHEMA_VERSION,
            request: record.clone(),
        },
    )
}

/// Read the whole cache record stored at `path`.
pub fn read(path: &Path, fs: &impl FileOperations) -> Result<CacheRecord> {
    let contents = fs
        .read_utf8(path)
        .with_context(|| CrabError::CacheDecode(path.to_path_buf()))?;

    let file: CacheFile = toml::from_str(&contents)
        .map_err(|_| CrabError::CacheDecode(path.to_path_buf()))
        .with_context(ctx!(
          "The cache file {path:?} is corrupt", ;
          "Remove it and recreate it with `crab remake`",
        ))?;

    if file.version != CACHE_SCHEMA_VERSION {
        return Err(CrabError::CacheDecode(path.to_path_buf())).with_context(ctx!(
          "The cache file {path:?} has version {}, expected {CACHE_SCHEMA_VERSION}", file.version;
          "It was written by a different version of crab, recreate it with `crab remake`",
        ));
    }

    Ok(file.request)
}

#[cfg(test)]
#[path = "tests/cache.rs"]
mod tests;
