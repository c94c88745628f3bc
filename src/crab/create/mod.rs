use anyhow::Context;
use anyhow::Result;
use chrono::DateTime;
use chrono::Local;
use crab_lib::cache;
use crab_lib::cache::CacheRecord;
use crab_lib::config::Config;
use crab_lib::constants::CACHE_FILE;
use crab_lib::constants::PRIMARY_STYLE;
use crab_lib::ctx;
use crab_lib::error::CrabError;
use crab_lib::file_system::FileOperations;
use crab_lib::logging::TaskLog;
use crab_lib::plugins::job_types::job_types;
use crab_lib::plugins::job_types::JobType;
use crab_lib::plugins::PluginLoader;
use crab_lib::work_area::WorkArea;
use crab_lib::work_area::WorkAreaManager;

use crate::cli::def::CreateStruct;

/// Pick the job type asked for, by name or from a plugin file.
pub fn resolve_job_type(args: &CreateStruct) -> Result<Box<dyn JobType>> {
    if let Some(file) = &args.plugin_file {
        let mut loader = PluginLoader::new();
        let external = loader.load_external(file);

        return match external.iter().next() {
            Some((_, plugin)) => Ok(Box::new(plugin.handle.clone()) as Box<dyn JobType>),
            None => Err(CrabError::Configuration(format!(
                "No job type could be loaded from {file:?}"
            )))
            .with_context(ctx!(
              "Could not use the plugin file {file:?}", ;
              "Ensure that it exists and is a regular file",
            )),
        };
    }

    let types = job_types();

    if let Some(plugin) = types.get(&args.job_type.to_uppercase()) {
        return Ok((plugin.handle)());
    }

    let known = types
        .iter()
        .map(|(_, plugin)| plugin.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Err(CrabError::Configuration(format!(
        "The job type {:?} is not known",
        args.job_type
    )))
    .with_context(ctx!(
      "Could not create a task", ;
      "Use one of: {known}",
    ))
}

/// Split `host[:port]` into the host and the port, empty if there is none.
pub fn split_port(server: &str) -> (String, String) {
    let server = server.trim_start_matches("https://");

    match server.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            (host.to_string(), port.to_string())
        }
        _ => (server.to_string(), String::new()),
    }
}

/// Create the work area of a new task and record where it is served from.
pub fn create_task<F: FileOperations>(
    args: &CreateStruct,
    config: &Config,
    manager: &WorkAreaManager<'_, F>,
    fs: &F,
    log: &mut TaskLog,
    now: DateTime<Local>,
) -> Result<(WorkArea, CacheRecord)> {
    let job_type = resolve_job_type(args)?;
    let target = config.target()?;

    let base = args.work_area.as_deref().or(config.work_area.as_deref());
    let area = manager.create(base, args.request_name.as_deref(), now, log)?;

    log.info(format!("Created the work area {:?}", area.path));

    let mut general = toml::Table::new();
    general.insert("requestName".to_string(), area.request_name.clone().into());
    general.insert(
        "workArea".to_string(),
        area.path.to_string_lossy().to_string().into(),
    );

    let mut original_config = job_type.config();
    original_config.insert("General".to_string(), general.into());

    let (server, port) = split_port(&target.server);

    let record = CacheRecord {
        server,
        port,
        request_name: area.request_name.clone(),
        vo_role: config.vo_role.clone(),
        vo_group: config.vo_group.clone(),
        instance: target.instance,
        original_config,
    };

    let cache_path = area.path.join(CACHE_FILE);
    cache::write(&cache_path, &record, fs)?;

    log.info(format!(
        "{PRIMARY_STYLE}Success{PRIMARY_STYLE:#}: {} task {} is ready in {:?}",
        job_type.plugin_name(),
        area.request_name,
        area.path
    ));

    Ok((area, record))
}
