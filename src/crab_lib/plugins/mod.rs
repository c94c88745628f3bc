/// The job types a task can be created with.
pub mod job_types;

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use log::debug;

use self::job_types::ExternalJobType;

/// One entry of a compiled-in plugin catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry<H> {
    /// The name the plugin is registered under.
    pub module: &'static str,

    /// The name the plugin presents itself with, if it differs.
    pub name: Option<&'static str>,

    /// The plugin itself, [None] for helper entries that provide none.
    pub handle: Option<H>,
}

impl<H> CatalogEntry<H> {
    /// An entry providing `handle`, named after its module.
    pub const fn new(module: &'static str, handle: H) -> Self {
        Self {
            module,
            name: None,
            handle: Some(handle),
        }
    }

    /// Present the plugin as `name` instead of its module.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// An entry that provides no plugin.
    pub const fn helper(module: &'static str) -> Self {
        Self {
            module,
            name: None,
            handle: None,
        }
    }
}

/// A loaded plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin<H> {
    /// The name the plugin presents itself with.
    pub name: String,

    /// The plugin itself.
    pub handle: H,
}

/// Plugins by the name they are looked up with.
///
/// Built fresh on every invocation, nothing about it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRegistry<H> {
    /// The loaded plugins.
    plugins: BTreeMap<String, Plugin<H>>,
}

impl<H> Default for PluginRegistry<H> {
    fn default() -> Self {
        Self {
            plugins: BTreeMap::new(),
        }
    }
}

impl<H: Clone> PluginRegistry<H> {
    /// Load every plugin of `catalog` whose module is not in `exclude`.
    ///
    /// Entries without a handle are skipped silently.
    pub fn load(catalog: &[CatalogEntry<H>], exclude: &[&str]) -> Self {
        let mut plugins = BTreeMap::new();

        for entry in catalog {
            if exclude.contains(&entry.module) {
                continue;
            }

            let Some(handle) = &entry.handle else {
                continue;
            };

            plugins.insert(
                entry.module.to_string(),
                Plugin {
                    name: entry.name.unwrap_or(entry.module).to_string(),
                    handle: handle.clone(),
                },
            );
        }

        Self { plugins }
    }
}

impl<H> PluginRegistry<H> {
    /// Look up a plugin.
    pub fn get(&self, key: &str) -> Option<&Plugin<H>> {
        self.plugins.get(key)
    }

    /// The keys of all plugins, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// All plugins, in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Plugin<H>> {
        self.plugins.iter()
    }

    /// The number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether there are no plugins.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Re-key every plugin with `f`.
    pub fn rekey(self, f: impl Fn(&str) -> String) -> Self {
        Self {
            plugins: self
                .plugins
                .into_iter()
                .map(|(key, plugin)| (f(&key), plugin))
                .collect(),
        }
    }

    /// Keep only the plugins `f` accepts.
    pub fn filter(mut self, f: impl Fn(&Plugin<H>) -> bool) -> Self {
        self.plugins.retain(|_, plugin| f(plugin));
        self
    }
}

/// Loads plugins that live outside the client.
#[derive(Debug, Clone, Default)]
pub struct PluginLoader {
    /// Directories external plugins have been loaded from.
    search_path: Vec<PathBuf>,
}

impl PluginLoader {
    /// A loader with an empty search path.
    pub fn new() -> Self {
        Self::default()
    }

    /// The directories external plugins have been loaded from.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Load the external job type at `path`.
    ///
    /// The plugin is named after the file stem. A path that is not an
    /// existing regular file yields no plugins.
    pub fn load_external(&mut self, path: &Path) -> PluginRegistry<ExternalJobType> {
        let mut registry = PluginRegistry::default();

        if !path.is_file() {
            debug!("No plugin file at {path:?}");
            return registry;
        }

        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            return registry;
        };

        let folder = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        if !self.search_path.contains(&folder) {
            debug!("Adding {folder:?} to the plugin search path");
            self.search_path.push(folder);
        }

        registry.plugins.insert(
            stem.clone(),
            Plugin {
                name: stem.clone(),
                handle: ExternalJobType::new(stem, path.to_path_buf()),
            },
        );

        registry
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
