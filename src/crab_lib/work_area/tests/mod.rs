use std::fs;

use chrono::TimeZone;
use tempdir::TempDir;

use super::*;
use crate::error::kind;
use crate::task_name::TaskNameFilter;
use crate::test_utils::DRY_FS;
use crate::test_utils::NO_FOLDERS_FS;
use crate::test_utils::REAL_FS;

const TASK: &str = "140101_120000_crab3test-5:jdoe_crab_mytask";

fn noon() -> DateTime<Local> {
    Local.with_ymd_and_hms(2014, 1, 1, 12, 0, 0).unwrap()
}

fn target() -> ServerTarget {
    ServerTarget {
        server: "cmsweb.cern.ch".to_string(),
        instance: "prod".to_string(),
    }
}

fn task() -> TaskName {
    TaskNameFilter::new().unwrap().parse(TASK).unwrap()
}

#[test]
fn request_name_test() {
    assert_eq!("crab_mytask", request_name(Some("mytask"), noon()).unwrap());
    assert_eq!("crab_20140101_120000", request_name(None, noon()).unwrap());
    assert_eq!("crab_20140101_120000", request_name(Some(""), noon()).unwrap());

    let err = request_name(Some("a/b"), noon()).unwrap_err();
    assert!(matches!(kind(&err), Some(CrabError::Configuration(_))));
}

#[test]
fn base_folder_test() {
    let cwd = PathBuf::from("/home/jdoe");

    let plain = WorkAreaManager::new(&REAL_FS, cwd.clone(), None);
    assert_eq!(cwd, plain.base_folder(None));
    assert_eq!(cwd, plain.base_folder(Some(Path::new("."))));
    assert_eq!(cwd.join("areas"), plain.base_folder(Some(Path::new("areas"))));
    assert_eq!(
        PathBuf::from("/data"),
        plain.base_folder(Some(Path::new("/data")))
    );

    let with_env = WorkAreaManager::new(&REAL_FS, cwd.clone(), Some("/scratch".into()));
    assert_eq!(PathBuf::from("/scratch"), with_env.base_folder(None));
    assert_eq!(
        PathBuf::from("/scratch"),
        with_env.base_folder(Some(Path::new(".")))
    );
    assert_eq!(
        cwd.join("areas"),
        with_env.base_folder(Some(Path::new("areas")))
    );
}

#[test]
fn create_makes_the_layout() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&REAL_FS, tmp.path().to_path_buf(), None);
    let mut log = TaskLog::new();

    let area = manager
        .create(Some(Path::new("areas")), Some("mytask"), noon(), &mut log)
        .unwrap();

    let expected = tmp.path().join("areas/crab_mytask");
    assert_eq!(expected, area.path);
    assert_eq!("crab_mytask", area.request_name);
    assert_eq!(expected.join("crab.log"), area.log_path);
    assert_eq!(Some(area.log_path.as_path()), log.path());
    assert!(expected.join("results").is_dir());
    assert!(expected.join("inputs").is_dir());
}

#[test]
fn create_refuses_duplicates() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&REAL_FS, tmp.path().to_path_buf(), None);
    let mut log = TaskLog::new();

    manager.create(None, Some("mytask"), noon(), &mut log).unwrap();
    let err = manager
        .create(None, Some("mytask"), noon(), &mut log)
        .unwrap_err();

    assert_eq!(
        Some(&CrabError::DuplicateWorkArea(tmp.path().join("crab_mytask"))),
        kind(&err)
    );
}

#[test]
fn create_with_a_slash_creates_nothing() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&REAL_FS, tmp.path().to_path_buf(), None);
    let mut log = TaskLog::new();

    let err = manager
        .create(Some(Path::new("areas")), Some("a/b"), noon(), &mut log)
        .unwrap_err();

    assert!(matches!(kind(&err), Some(CrabError::Configuration(_))));
    assert_eq!(0, fs::read_dir(tmp.path()).unwrap().count());
    assert_eq!(None, log.path());
}

#[test]
fn create_dry_writes_nothing() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&DRY_FS, tmp.path().to_path_buf(), None);
    let mut log = TaskLog::new();

    let area = manager.create(None, Some("x"), noon(), &mut log).unwrap();

    assert_eq!(tmp.path().join("crab_x"), area.path);
    assert!(!area.path.exists());
}

#[test]
fn remake_builds_the_work_area_once() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&REAL_FS, tmp.path().to_path_buf(), None);
    let log = TaskLog::new();

    let record = manager.remake(&task(), &target(), &log).unwrap().unwrap();

    assert_eq!(TASK, record.request_name);
    assert_eq!("cmsweb.cern.ch", record.server);
    assert_eq!("prod", record.instance);
    assert_eq!("", record.port);
    assert_eq!("", record.vo_role);
    assert_eq!("", record.vo_group);
    assert!(record.original_config.is_empty());

    let area = tmp.path().join("crab_mytask");
    assert!(area.join("results").is_dir());
    assert!(area.join("inputs").is_dir());
    assert_eq!(
        record,
        cache::read(&area.join(".requestcache"), &REAL_FS).unwrap()
    );

    // the second time the cache is left alone
    assert_eq!(None, manager.remake(&task(), &target(), &log).unwrap());
    assert_eq!(
        record,
        cache::read(&area.join(".requestcache"), &REAL_FS).unwrap()
    );
}

#[test]
fn remake_fills_in_an_existing_folder() {
    let tmp = TempDir::new("work_area").unwrap();
    let area = tmp.path().join("crab_mytask");
    fs::create_dir(&area).unwrap();
    fs::create_dir(area.join("results")).unwrap();

    let manager = WorkAreaManager::new(&REAL_FS, tmp.path().to_path_buf(), None);
    assert!(manager
        .remake(&task(), &target(), &TaskLog::new())
        .unwrap()
        .is_some());

    assert!(area.join("inputs").is_dir());
    assert!(area.join(".requestcache").is_file());
}

#[test]
fn remake_falls_back_to_the_current_directory() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&NO_FOLDERS_FS, tmp.path().to_path_buf(), None);

    let record = manager
        .remake(&task(), &target(), &TaskLog::new())
        .unwrap()
        .unwrap();

    assert!(!tmp.path().join("crab_mytask").exists());
    assert_eq!(
        record,
        cache::read(&tmp.path().join(".requestcache"), &REAL_FS).unwrap()
    );
}

#[test]
fn remake_fallback_keeps_an_existing_cache() {
    let tmp = TempDir::new("work_area").unwrap();
    let kept = CacheRecord {
        server: "keep.me".to_string(),
        request_name: "precious".to_string(),
        ..CacheRecord::default()
    };
    cache::write(&tmp.path().join(CACHE_FILE), &kept, &REAL_FS).unwrap();

    let manager = WorkAreaManager::new(&NO_FOLDERS_FS, tmp.path().to_path_buf(), None);
    assert_eq!(
        None,
        manager.remake(&task(), &target(), &TaskLog::new()).unwrap()
    );

    assert_eq!(
        kept,
        cache::read(&tmp.path().join(CACHE_FILE), &REAL_FS).unwrap()
    );
}

#[test]
fn remake_fallback_happens_once_per_directory() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&NO_FOLDERS_FS, tmp.path().to_path_buf(), None);
    let filter = TaskNameFilter::new().unwrap();
    let other = filter
        .parse("140101_130000_crab3test-5:jdoe_crab_other")
        .unwrap();

    let first = manager.remake(&task(), &target(), &TaskLog::new()).unwrap();
    assert!(first.is_some());
    assert_eq!(
        None,
        manager.remake(&other, &target(), &TaskLog::new()).unwrap()
    );

    assert_eq!(
        task().raw,
        cache::read(&tmp.path().join(CACHE_FILE), &REAL_FS)
            .unwrap()
            .request_name
    );
}

#[test]
fn locate_test() {
    let manager = WorkAreaManager::new(&REAL_FS, PathBuf::from("/home/jdoe"), None);

    assert_eq!(
        (PathBuf::from("/home/jdoe/crab_x"), "crab_x".to_string()),
        manager.locate(Path::new("crab_x"))
    );
    assert_eq!(
        (PathBuf::from("/data/crab_y/"), "crab_y".to_string()),
        manager.locate(Path::new("/data/crab_y/"))
    );
    assert_eq!(
        (PathBuf::from("/home/jdoe/crab_z"), "crab_z".to_string()),
        manager.locate(Path::new("crab_z/"))
    );
}

#[test]
fn load_names_the_task_without_trailing_separators() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&REAL_FS, tmp.path().to_path_buf(), None);

    let err = manager
        .load(Path::new("crab_gone/"), &mut TaskLog::new())
        .unwrap_err();
    assert_eq!(
        Some(&CrabError::TaskNotFound("crab_gone".to_string())),
        kind(&err)
    );
}

#[test]
fn load_reads_the_cache_and_moves_the_log() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&REAL_FS, tmp.path().to_path_buf(), None);
    let record = manager
        .remake(&task(), &target(), &TaskLog::new())
        .unwrap()
        .unwrap();

    let mut log = TaskLog::new();
    let (loaded, log_path) = manager.load(Path::new("crab_mytask"), &mut log).unwrap();

    assert_eq!(record, loaded);
    assert_eq!(tmp.path().join("crab_mytask/crab.log"), log_path);
    assert_eq!(Some(log_path.as_path()), log.path());

    let absolute = tmp.path().join("crab_mytask");
    let (loaded, _) = manager.load(&absolute, &mut log).unwrap();
    assert_eq!(record, loaded);
}

#[test]
fn load_reports_what_is_missing() {
    let tmp = TempDir::new("work_area").unwrap();
    let manager = WorkAreaManager::new(&REAL_FS, tmp.path().to_path_buf(), None);
    let mut log = TaskLog::new();

    let err = manager.load(Path::new("crab_gone"), &mut log).unwrap_err();
    assert_eq!(
        Some(&CrabError::TaskNotFound("crab_gone".to_string())),
        kind(&err)
    );

    fs::create_dir(tmp.path().join("crab_empty")).unwrap();
    let err = manager
        .load(Path::new("./crab_empty"), &mut log)
        .unwrap_err();
    assert_eq!(
        Some(&CrabError::CacheNotFound("crab_empty".to_string())),
        kind(&err)
    );

    assert_eq!(None, log.path());
}
