use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use crab_lib::constants::instance_host;
use crab_lib::constants::instance_names;
use crab_lib::constants::BASE_URL;
use crab_lib::constants::PRIVATE_INSTANCE;
use crab_lib::constants::PRIVATE_INSTANCE_ALIAS;
use crab_lib::ctx;
use crab_lib::error::CrabError;
use serde_json::Value;

/// The REST client used to reach the server, over HTTPS.
pub mod interactor;

/// The interface for talking to a CRAB server.
/// This is over HTTPS in practice, tests use a canned one.
pub trait RestInteractor {
    /// Send a GET request for `uri` on `host` and return the JSON body.
    fn get(&self, host: &str, uri: &str, params: &[(&str, &str)]) -> Result<Value>;

    /// Upload the file at `path` to the cache at `endpoint`, stored as
    /// `name`.
    fn upload_log(&self, endpoint: &str, path: &Path, name: &str) -> Result<()>;
}

/// The path of `resource` on the server of `instance`.
///
/// Private deployments are addressed like the development one.
pub fn server_url(instance: &str, resource: &str) -> Result<String> {
    if instance_host(instance).is_some() {
        return Ok(format!("{BASE_URL}{instance}/{resource}"));
    }

    if instance == PRIVATE_INSTANCE {
        return Ok(format!("{BASE_URL}{PRIVATE_INSTANCE_ALIAS}/{resource}"));
    }

    Err(CrabError::Configuration(format!(
        "Error: only {} instances can be used",
        instance_names()
    )))
    .with_context(ctx!(
      "The instance {instance:?} is not known", ;
      "Set the instance to one of {}, or give a server url", instance_names()
    ))
}

/// Ask `server` for `subresource` of the `info` resource at `base_url`.
///
/// Returns the first record of the result.
pub fn get_server_info(
    rest: &impl RestInteractor,
    subresource: &str,
    server: &str,
    base_url: &str,
    extra: &[(&str, &str)],
) -> Result<Value> {
    let mut params = vec![("subresource", subresource)];
    params.extend_from_slice(extra);

    let body = rest.get(server, base_url, &params)?;

    if let Some(first) = body
        .get("result")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
    {
        return Ok(first.clone());
    }

    Err(CrabError::Communication(format!(
        "The server sent no {subresource} information"
    )))
    .with_context(ctx!(
      "Unexpected answer from {server}{base_url}: {body}", ;
      "The server may be misconfigured, try again later",
    ))
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
