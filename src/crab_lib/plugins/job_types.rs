use std::fmt::Debug;
use std::path::PathBuf;

use super::CatalogEntry;
use super::PluginRegistry;

/// What a job type contributes to a new task.
pub trait JobType: Debug {
    /// The name the server knows the job type by.
    fn plugin_name(&self) -> &str;

    /// The configuration section recorded for tasks of this type.
    fn config(&self) -> toml::Table;
}

/// Builds a fresh [JobType].
pub type JobTypeFactory = fn() -> Box<dyn JobType>;

/// The base the other job types are built on, never used on its own.
#[derive(Debug)]
pub struct BasicJobType;

/// Analysis of an existing dataset.
#[derive(Debug)]
pub struct Analysis;

/// Private Monte Carlo generation.
#[derive(Debug)]
pub struct PrivateMC;

/// A job type provided by a file outside the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalJobType {
    /// The file stem of the plugin.
    name: String,

    /// The plugin file.
    file: PathBuf,
}

impl ExternalJobType {
    /// A job type named `name`, provided by `file`.
    pub fn new(name: String, file: PathBuf) -> Self {
        Self { name, file }
    }

    /// The plugin file.
    pub fn file(&self) -> &PathBuf {
        &self.file
    }
}

fn section(plugin_name: &str, splitting: Option<&str>) -> toml::Table {
    let mut job_type = toml::Table::new();
    job_type.insert("pluginName".to_string(), plugin_name.into());

    let mut config = toml::Table::new();
    config.insert("JobType".to_string(), job_type.into());

    if let Some(splitting) = splitting {
        let mut data = toml::Table::new();
        data.insert("splitting".to_string(), splitting.into());
        config.insert("Data".to_string(), data.into());
    }

    config
}

impl JobType for BasicJobType {
    fn plugin_name(&self) -> &str {
        "BasicJobType"
    }

    fn config(&self) -> toml::Table {
        section(self.plugin_name(), None)
    }
}

impl JobType for Analysis {
    fn plugin_name(&self) -> &str {
        "Analysis"
    }

    fn config(&self) -> toml::Table {
        section(self.plugin_name(), Some("FileBased"))
    }
}

impl JobType for PrivateMC {
    fn plugin_name(&self) -> &str {
        "PrivateMC"
    }

    fn config(&self) -> toml::Table {
        section(self.plugin_name(), Some("EventBased"))
    }
}

impl JobType for ExternalJobType {
    fn plugin_name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> toml::Table {
        let mut config = section(&self.name, None);

        if let Some(toml::Value::Table(job_type)) = config.get_mut("JobType") {
            job_type.insert(
                "externalPluginFile".to_string(),
                self.file.to_string_lossy().to_string().into(),
            );
        }

        config
    }
}

fn basic() -> Box<dyn JobType> {
    Box::new(BasicJobType)
}

fn analysis() -> Box<dyn JobType> {
    Box::new(Analysis)
}

fn private_mc() -> Box<dyn JobType> {
    Box::new(PrivateMC)
}

/// Every job type compiled into the client.
pub fn catalog() -> Vec<CatalogEntry<JobTypeFactory>> {
    vec![
        CatalogEntry::new("BasicJobType", basic as JobTypeFactory),
        CatalogEntry::new("Analysis", analysis as JobTypeFactory),
        CatalogEntry::new("PrivateMC", private_mc as JobTypeFactory),
        // lumi mask and config helpers, nothing to register
        CatalogEntry::helper("CMSSWConfig"),
        CatalogEntry::helper("LumiMask"),
    ]
}

/// The job types a task can use, by upper-case name.
pub fn job_types() -> PluginRegistry<JobTypeFactory> {
    PluginRegistry::load(&catalog(), &["BasicJobType"]).rekey(str::to_uppercase)
}
