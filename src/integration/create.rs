use std::fs;

use crate::crab;
use crate::init;
use crate::stderr;

#[test]
fn test_create() {
    let env = init();

    crab!(env; "create", "-r", "mytask", "-j", "privatemc"; "create");

    let area = env.temp_dir.path().join("crab_mytask");
    let cache = fs::read_to_string(area.join(".requestcache")).unwrap();

    assert!(cache.contains("RequestName = \"crab_mytask\""));
    assert!(cache.contains("pluginName = \"PrivateMC\""));
    assert!(area.join("crab.log").is_file());
    assert!(area.join("results").is_dir());
}

#[test]
fn test_create_from_config() {
    let env = init();

    fs::write(
        env.temp_dir.path().join("crab.toml"),
        "instance = \"preprod\"\nwork_area = \"tasks\"\n",
    )
    .unwrap();

    crab!(env; "create", "-r", "configured"; "create");

    let cache = fs::read_to_string(
        env.temp_dir
            .path()
            .join("tasks/crab_configured/.requestcache"),
    )
    .unwrap();

    assert!(cache.contains("Server = \"cmsweb-testbed.cern.ch\""));
    assert!(cache.contains("instance = \"preprod\""));
}

#[test]
fn test_create_twice() {
    let env = init();

    crab!(env; "create", "-r", "twice"; "first create");

    let out = crab!(env; "create", "-r", "twice");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("already exists"));
}

#[test]
fn test_create_bad_names() {
    let env = init();

    let out = crab!(env; "create", "-r", "a/b");
    assert!(!out.status.success());

    let out = crab!(env; "create", "-r", "x", "-j", "nonsense");
    assert!(!out.status.success());

    let out = crab!(env; "create", "-r", "x", "--server-url", "host/path");
    assert!(!out.status.success());

    assert_eq!(0, fs::read_dir(env.temp_dir.path()).unwrap().count());
}
