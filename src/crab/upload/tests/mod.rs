use std::fs;

use chrono::TimeZone;
use serde_json::json;
use tempdir::TempDir;

use super::*;
use crate::test_utils::MockRest;

const CACHE: &str = "https://cmsweb.cern.ch/crabcache";

fn noon() -> DateTime<Local> {
    Local.with_ymd_and_hms(2014, 1, 1, 12, 0, 0).unwrap()
}

fn backend() -> MockRest {
    MockRest::answering(json!({"result": [{"cacheSSL": CACHE}]}))
}

/// A folder with a `crab.log` and a proxy, and a config using that proxy.
fn setup() -> (TempDir, Config) {
    let tmp = TempDir::new("upload").unwrap();
    fs::write(tmp.path().join(LOG_FILE), "info 2014: \t hello\n").unwrap();
    fs::write(tmp.path().join("proxy"), "").unwrap();

    let config = Config {
        credential: Some(tmp.path().join("proxy")),
        ..Config::default()
    };

    (tmp, config)
}

#[test]
fn upload_the_local_log() {
    let (tmp, config) = setup();
    let rest = backend();

    let url = upload_log_file(
        &rest,
        &TaskLog::new(),
        &LogUpload::default(),
        &config,
        tmp.path(),
        noon(),
    );

    assert_eq!(
        Some(format!("{CACHE}/logfile?name=2014-01-01_120000_crab.log")),
        url
    );

    let requests = rest.requests.borrow();
    assert_eq!("cmsweb.cern.ch", requests[0].0);
    assert_eq!("/crabserver/prod/info", requests[0].1);

    let uploads = rest.uploads.borrow();
    assert_eq!(
        vec![(
            CACHE.to_string(),
            tmp.path().join(LOG_FILE),
            "2014-01-01_120000_crab.log".to_string()
        )],
        *uploads
    );
}

#[test]
fn upload_a_named_log_to_a_private_server() {
    let (tmp, mut config) = setup();
    config.instance = "mine".to_string();
    config.server_url = Some("myhost.cern.ch:8443".to_string());
    let rest = backend();

    let other = tmp.path().join("other.log");
    fs::write(&other, "").unwrap();

    let url = upload_log_file(
        &rest,
        &TaskLog::new(),
        &LogUpload {
            log_name: Some("mine.log".to_string()),
            log_path: Some(other.clone()),
        },
        &config,
        tmp.path(),
        noon(),
    );

    assert_eq!(Some(format!("{CACHE}/logfile?name=mine.log")), url);
    assert_eq!("myhost.cern.ch:8443", rest.requests.borrow()[0].0);
    assert_eq!("/crabserver/dev/info", rest.requests.borrow()[0].1);
    assert_eq!(other, rest.uploads.borrow()[0].1);
}

#[test]
fn nothing_is_uploaded_without_preconditions() {
    let (tmp, config) = setup();
    let log = TaskLog::new();

    // missing explicit log
    let rest = backend();
    let missing = LogUpload {
        log_path: Some(tmp.path().join("missing.log")),
        ..LogUpload::default()
    };
    assert_eq!(
        None,
        upload_log_file(&rest, &log, &missing, &config, tmp.path(), noon())
    );

    // no crab.log in the directory
    let empty = TempDir::new("upload").unwrap();
    assert_eq!(
        None,
        upload_log_file(&rest, &log, &LogUpload::default(), &config, empty.path(), noon())
    );

    // unknown instance without a server
    let unknown = Config {
        instance: "mine".to_string(),
        ..config.clone()
    };
    assert_eq!(
        None,
        upload_log_file(&rest, &log, &LogUpload::default(), &unknown, tmp.path(), noon())
    );

    // no proxy
    let no_proxy = Config {
        credential: Some(tmp.path().join("no_proxy")),
        ..config.clone()
    };
    assert_eq!(
        None,
        upload_log_file(&rest, &log, &LogUpload::default(), &no_proxy, tmp.path(), noon())
    );

    assert!(rest.requests.borrow().is_empty());
    assert!(rest.uploads.borrow().is_empty());
}

#[test]
fn server_failures_are_not_errors() {
    let (tmp, config) = setup();
    let log = TaskLog::new();

    let unreachable = MockRest::unreachable();
    assert_eq!(
        None,
        upload_log_file(&unreachable, &log, &LogUpload::default(), &config, tmp.path(), noon())
    );

    let no_cache = MockRest::answering(json!({"result": [{}]}));
    assert_eq!(
        None,
        upload_log_file(&no_cache, &log, &LogUpload::default(), &config, tmp.path(), noon())
    );

    let refusing = MockRest {
        fail_uploads: true,
        ..backend()
    };
    assert_eq!(
        None,
        upload_log_file(&refusing, &log, &LogUpload::default(), &config, tmp.path(), noon())
    );
}
