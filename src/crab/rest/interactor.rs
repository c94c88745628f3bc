use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::crate_version;
use crab_lib::ctx;
use crab_lib::error::CrabError;
use crab_lib::file_system::FileOperations;
use crab_lib::file_system::FileSystemInteractor;
use log::debug;
use log::trace;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::Identity;
use serde_json::Value;

use super::RestInteractor;

/// Talks to the server over HTTPS, authenticated with a proxy certificate.
#[derive(Debug, Clone)]
pub struct HttpsRest {
    /// The proxy certificate, holding both the certificate and its key.
    credential: PathBuf,

    /// Reads the credential.
    fs: FileSystemInteractor,
}

impl HttpsRest {
    /// A client authenticating with the proxy at `credential`.
    ///
    /// The credential is only read when a request is made.
    pub fn new(credential: PathBuf, fs: FileSystemInteractor) -> Self {
        Self { credential, fs }
    }

    fn client(&self) -> Result<Client> {
        let pem = self.fs.read_bytes(&self.credential)?;

        let identity = Identity::from_pem(&pem)
            .map_err(|e| CrabError::Communication(e.to_string()))
            .with_context(ctx!(
              "Could not use the proxy {:?}", self.credential;
              "Renew the proxy with voms-proxy-init",
            ))?;

        Client::builder()
            .identity(identity)
            .user_agent(format!("crab/{}", crate_version!()))
            .build()
            .map_err(|e| CrabError::Communication(e.to_string()))
            .with_context(ctx!(
              "Could not set up the connection", ;
              "",
            ))
    }
}

fn checked(response: reqwest::Result<Response>, url: &str) -> Result<Response> {
    response
        .and_then(Response::error_for_status)
        .map_err(|e| CrabError::Communication(e.to_string()))
        .with_context(ctx!(
          "The request to {url} failed", ;
          "Check that the server url is correct and that the proxy is valid",
        ))
}

impl RestInteractor for HttpsRest {
    fn get(&self, host: &str, uri: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("https://{host}{uri}");
        debug!("GET {url} {params:?}");

        let response = checked(self.client()?.get(&url).query(params).send(), &url)?;

        let body = response
            .json::<Value>()
            .map_err(|e| CrabError::Communication(e.to_string()))
            .with_context(ctx!(
              "The answer of {url} is not JSON", ;
              "",
            ))?;

        trace!("Got {body}");

        Ok(body)
    }

    fn upload_log(&self, endpoint: &str, path: &Path, name: &str) -> Result<()> {
        let url = format!("{endpoint}/logfile");
        debug!("Uploading {path:?} to {url} as {name}");

        if self.fs.dry_run {
            debug!("(Dry) Would have uploaded {path:?}");
            return Ok(());
        }

        let form = Form::new()
            .text("name", name.to_string())
            .file("inputfile", path)
            .with_context(ctx!(
              "Could not read the log file {path:?}", ;
              "Ensure that the file exists and you have permissions to access it",
            ))?;

        checked(self.client()?.put(&url).multipart(form).send(), &url)?;

        Ok(())
    }
}
