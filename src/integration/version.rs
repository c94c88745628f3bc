use clap::crate_version;

use crate::crab;
use crate::init;
use crate::stdout;

#[test]
fn test_crab_short_version() {
    let env = init();

    let out = crab!(env; "version", "-s"; "version");

    assert_eq!(format!("crab {}\n", crate_version!()), stdout(&out));
}

#[test]
fn test_crab_version() {
    let env = init();

    let out = crab!(env; "version"; "version");

    assert!(stdout(&out).contains(crate_version!()));
}
