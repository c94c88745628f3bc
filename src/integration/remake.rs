use std::fs;

use crate::crab;
use crate::init;
use crate::stderr;
use crate::stdout;

const TASK: &str = "140101_120000_crab3test-5:jdoe_crab_mytask";

#[test]
fn test_remake_json() {
    let env = init();

    let out = crab!(env; "remake", "--cmptask", TASK, "--json"; "remake");
    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();

    assert_eq!("SUCCESS", report["status"]);
    assert_eq!(
        "cmsweb.cern.ch",
        report["result"]["remade"][0][TASK]["Server"]
    );

    let area = env.temp_dir.path().join("crab_mytask");
    assert!(area.join(".requestcache").is_file());
    assert!(area.join("results").is_dir());
    assert!(area.join("inputs").is_dir());
}

#[test]
fn test_remake_twice() {
    let env = init();

    crab!(env; "rmk", "--cmptask", TASK; "first remake");
    let cache = fs::read(env.temp_dir.path().join("crab_mytask/.requestcache")).unwrap();

    let out = crab!(env; "remake", "--cmptask", TASK, "-s");

    assert!(!out.status.success());
    assert!(stdout(&out).contains("Status: FAILED"));
    assert_eq!(
        cache,
        fs::read(env.temp_dir.path().join("crab_mytask/.requestcache")).unwrap()
    );
}

#[test]
fn test_remake_partially() {
    let env = init();

    let list = format!("{TASK}, not-a-task");
    let out = crab!(env; "remake", "--cmptask", list.as_str(), "-s"; "partial remake");

    assert!(stdout(&out).contains("Status: PARTIAL SUCCESS"));
}

#[test]
fn test_remake_without_tasks() {
    let env = init();

    let out = crab!(env; "remake");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("--cmptask"));

    let out = crab!(env; "remake", "--cmptask", "foo,bar");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("No task name matches"));

    assert_eq!(0, fs::read_dir(env.temp_dir.path()).unwrap().count());
}

#[test]
fn test_remake_dry() {
    let env = init();

    crab!(env; "remake", "--cmptask", TASK, "--dry"; "dry remake");

    assert!(!env.temp_dir.path().join("crab_mytask").exists());
}
