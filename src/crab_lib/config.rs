use std::env;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::instance_host;
use crate::constants::INSTANCE_DEFAULT;
use crate::constants::PRIVATE_INSTANCE;
use crate::constants::PROXY_ENV;
use crate::ctx;
use crate::error::CrabError;
use crate::file_system::FileOperations;
use crate::work_area::ServerTarget;

/// The client configuration, usually `crab.toml`.
///
/// # Examples
///
/// ```toml
/// instance = "preprod"
/// credential = "/tmp/x509up_u1000"
/// work_area = "tasks"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The server deployment to talk to.
    #[serde(default = "INSTANCE_DEFAULT")]
    pub instance: String,

    /// An explicit server, `host` or `host:port`.
    pub server_url: Option<String>,

    /// The proxy certificate used to authenticate.
    pub credential: Option<PathBuf>,

    /// Where new work areas are created.
    pub work_area: Option<PathBuf>,

    /// The VOMS role to request.
    #[serde(default)]
    pub vo_role: String,

    /// The VOMS group to request.
    #[serde(default)]
    pub vo_group: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instance: INSTANCE_DEFAULT(),
            server_url: None,
            credential: None,
            work_area: None,
            vo_role: String::new(),
            vo_group: String::new(),
        }
    }
}

impl Config {
    /// Load a `Config` struct instance from a TOML file at the provided path.
    pub fn from_file<F: FileOperations>(path: &Path, fs: &F) -> Result<Config> {
        let config: Config = fs.try_read_toml(path)?;

        if let Some(url) = &config.server_url {
            check_server_url(url)?;
        }

        Ok(config)
    }

    /// Load the configuration at `path`, falling back to the defaults if
    /// the file does not exist and was not explicitly asked for.
    pub fn load<F: FileOperations>(path: &Path, explicit: bool, fs: &F) -> Result<Config> {
        if !explicit && !path.exists() {
            return Ok(Config::default());
        }

        Config::from_file(path, fs)
    }

    /// The proxy certificate to use.
    ///
    /// The configured one if present, then [PROXY_ENV], then the usual
    /// `/tmp/x509up_u<uid>` location.
    pub fn credential_path(&self) -> PathBuf {
        if let Some(path) = &self.credential {
            return path.clone();
        }

        if let Some(path) = env::var_os(PROXY_ENV) {
            return PathBuf::from(path);
        }

        default_proxy()
    }

    /// The server requests should go to.
    ///
    /// An explicit server with an instance that is not known is a private
    /// deployment.
    pub fn target(&self) -> Result<ServerTarget> {
        match (&self.server_url, instance_host(&self.instance)) {
            (Some(url), Some(_)) => Ok(ServerTarget {
                server: url.clone(),
                instance: self.instance.clone(),
            }),

            (Some(url), None) => Ok(ServerTarget {
                server: url.clone(),
                instance: PRIVATE_INSTANCE.to_string(),
            }),

            (None, Some(host)) => Ok(ServerTarget {
                server: host.to_string(),
                instance: self.instance.clone(),
            }),

            (None, None) => Err(CrabError::Configuration(format!(
                "The instance {:?} is not known and no server url was given",
                self.instance
            )))
            .with_context(ctx!(
              "Could not determine which server to use", ;
              "Use one of {} or give an explicit server url", crate::constants::instance_names()
            )),
        }
    }
}

/// Where `voms-proxy-init` puts the proxy of the current user.
#[cfg(unix)]
pub fn default_proxy() -> PathBuf {
    PathBuf::from(format!("/tmp/x509up_u{}", nix::unistd::getuid()))
}

/// Where `voms-proxy-init` puts the proxy of the current user.
#[cfg(not(unix))]
pub fn default_proxy() -> PathBuf {
    PathBuf::from("/tmp/x509up")
}

/// Check that `url` names only a server, as `[https://]host[:port]`.
pub fn valid_server_url(url: &str) -> bool {
    let full = if url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    let Ok(parsed) = reqwest::Url::parse(&full) else {
        return false;
    };

    let Some(host) = parsed.host_str() else {
        return false;
    };

    // the parser always reports a `/` path, so look at the text itself
    !host.is_empty()
        && !full.trim_start_matches("https://").contains('/')
        && parsed.query().is_none()
        && parsed.fragment().is_none()
        && parsed.username().is_empty()
        && parsed.password().is_none()
}

/// Fail with a configuration error unless `url` is a valid server url.
pub fn check_server_url(url: &str) -> Result<()> {
    if valid_server_url(url) {
        return Ok(());
    }

    Err(CrabError::Configuration(format!(
        "The server url {url:?} is not valid"
    )))
    .with_context(ctx!(
      "Could not use the server {url:?}", ;
      "Give only the host, optionally with a port, such as cmsweb.cern.ch:8443",
    ))
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
