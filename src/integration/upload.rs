use std::fs;

use crate::crab;
use crate::init;
use crate::stderr;

#[test]
fn test_upload_without_log() {
    let env = init();

    // nothing to upload is not an error
    let out = crab!(env; "upload-log", "--proxy", "/nonexistent/proxy"; "upload");
    assert!(stderr(&out).contains("not uploaded"));
}

#[test]
fn test_upload_missing_task() {
    let env = init();

    let out = crab!(env; "uploadlog", "--task", "crab_missing");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Working directory for task crab_missing not found"));

    fs::create_dir(env.temp_dir.path().join("crab_empty")).unwrap();

    let out = crab!(env; "uploadlog", "--task", "crab_empty");
    assert!(!out.status.success());
    assert!(stderr(&out).contains(".requestcache"));
}
