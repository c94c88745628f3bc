use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Local;
use crab_lib::config::Config;
use crab_lib::constants::ERROR_STYLE;
use crab_lib::constants::LOG_FILE;
use crab_lib::constants::LOG_UPLOAD_TIMESTAMP_FORMAT;
use crab_lib::logging::TaskLog;

use crate::rest::get_server_info;
use crate::rest::server_url;
use crate::rest::RestInteractor;

/// Which log to upload, and under what name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogUpload {
    /// The name to store the log under.
    pub log_name: Option<String>,

    /// The log file to upload.
    pub log_path: Option<PathBuf>,
}

/// Upload a log file to the server's user file cache.
///
/// Returns the url the log can be read back from, or [None] when it was
/// not uploaded. The reason is logged in that case.
pub fn upload_log_file(
    rest: &impl RestInteractor,
    log: &TaskLog,
    upload: &LogUpload,
    config: &Config,
    cwd: &Path,
    now: DateTime<Local>,
) -> Option<String> {
    let log_name = upload
        .log_name
        .clone()
        .unwrap_or_else(|| format!("{}_{LOG_FILE}", now.format(LOG_UPLOAD_TIMESTAMP_FORMAT)));

    let log_path = match &upload.log_path {
        Some(path) if path.exists() => path.clone(),
        Some(path) => {
            log.debug(format!(
                "{ERROR_STYLE}Error{ERROR_STYLE:#}: {path:?} does not exist"
            ));
            return None;
        }
        None if cwd.join(LOG_FILE).exists() => cwd.join(LOG_FILE),
        None => {
            log.debug(format!(
                "{ERROR_STYLE}Error{ERROR_STYLE:#}: Failed to find {LOG_FILE} in the current \
                directory {cwd:?}"
            ));
            return None;
        }
    };

    let target = match config.target() {
        Ok(target) => target,
        Err(e) => {
            log.debug(format!(
                "{ERROR_STYLE}Error{ERROR_STYLE:#}: no server to upload to, {}",
                e.root_cause()
            ));
            return None;
        }
    };

    let credential = config.credential_path();
    if !credential.is_file() {
        log.debug(format!("No proxy is given, {credential:?} does not exist"));
        return None;
    }

    let cache_url = match fetch_cache_url(rest, &target.server, &target.instance) {
        Ok(url) => url,
        Err(e) => {
            log.debug(format!("{e:#}"));
            log.error(format!(
                "{ERROR_STYLE}Error{ERROR_STYLE:#}: could not find where to upload the log, {}",
                e.root_cause()
            ));
            return None;
        }
    };

    log.debug(format!("cacheURL: {cache_url}\nLog file name: {log_name}"));
    log.info("Uploading log file");

    if let Err(e) = rest.upload_log(&cache_url, &log_path, &log_name) {
        log.debug(format!("{e:#}"));
        log.error(format!(
            "{ERROR_STYLE}Error{ERROR_STYLE:#}: the upload of {log_path:?} failed, {}",
            e.root_cause()
        ));
        return None;
    }

    let url = format!("{cache_url}/logfile?name={log_name}");
    log.info(format!("Log file url: {url}"));

    Some(url)
}

/// The `cacheSSL` endpoint of the server.
fn fetch_cache_url(
    rest: &impl RestInteractor,
    server: &str,
    instance: &str,
) -> anyhow::Result<String> {
    let base_url = server_url(instance, "info")?;
    let info = get_server_info(rest, "backendurls", server, &base_url, &[])?;

    info.get("cacheSSL")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("the server did not report a cacheSSL endpoint"))
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
