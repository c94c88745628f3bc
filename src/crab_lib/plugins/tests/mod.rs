use std::fs;

use tempdir::TempDir;

use super::job_types::job_types;
use super::job_types::JobType;
use super::*;

fn catalog() -> Vec<CatalogEntry<u32>> {
    vec![
        CatalogEntry::new("Base", 0),
        CatalogEntry::new("first", 1),
        CatalogEntry::new("second", 2).named("Second"),
        CatalogEntry::helper("utility"),
    ]
}

#[test]
fn load_skips_excluded_and_helpers() {
    let registry = PluginRegistry::load(&catalog(), &["Base"]);

    assert_eq!(vec!["first", "second"], registry.keys().collect::<Vec<_>>());
    assert_eq!(None, registry.get("Base"));
    assert_eq!(None, registry.get("utility"));
}

#[test]
fn names_default_to_the_module() {
    let registry = PluginRegistry::load(&catalog(), &[]);

    assert_eq!(
        Some(&Plugin {
            name: "first".to_string(),
            handle: 1
        }),
        registry.get("first")
    );
    assert_eq!("Second", registry.get("second").unwrap().name);
    assert_eq!(3, registry.len());
}

#[test]
fn rekey_and_filter() {
    let registry = PluginRegistry::load(&catalog(), &["Base"])
        .rekey(str::to_uppercase)
        .filter(|p| p.handle > 1);

    assert_eq!(vec!["SECOND"], registry.keys().collect::<Vec<_>>());
}

#[test]
fn builtin_job_types() {
    let types = job_types();

    assert_eq!(vec!["ANALYSIS", "PRIVATEMC"], types.keys().collect::<Vec<_>>());

    let analysis = (types.get("ANALYSIS").unwrap().handle)();
    assert_eq!("Analysis", analysis.plugin_name());
    assert_eq!(
        Some(&toml::Value::String("Analysis".to_string())),
        analysis.config()["JobType"].get("pluginName")
    );
    assert_eq!(
        Some(&toml::Value::String("FileBased".to_string())),
        analysis.config()["Data"].get("splitting")
    );
}

#[test]
fn load_external_plugin() {
    let tmp = TempDir::new("plugins").unwrap();
    let file = tmp.path().join("MyJobType.so");
    fs::write(&file, "").unwrap();

    let mut loader = PluginLoader::new();
    let registry = loader.load_external(&file);

    let plugin = registry.get("MyJobType").unwrap();
    assert_eq!("MyJobType", plugin.name);
    assert_eq!("MyJobType", plugin.handle.plugin_name());
    assert_eq!(&file, plugin.handle.file());
    assert_eq!(
        Some(&toml::Value::String(file.to_string_lossy().to_string())),
        plugin.handle.config()["JobType"].get("externalPluginFile")
    );

    // the folder is only added once
    loader.load_external(&file);
    assert_eq!(&[tmp.path().to_path_buf()], loader.search_path());
}

#[test]
fn load_external_needs_a_file() {
    let tmp = TempDir::new("plugins").unwrap();
    let mut loader = PluginLoader::new();

    assert!(loader.load_external(&tmp.path().join("missing.py")).is_empty());
    assert!(loader.load_external(tmp.path()).is_empty());
    assert!(loader.search_path().is_empty());
}
