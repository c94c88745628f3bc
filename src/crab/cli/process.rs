use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use chrono::Local;
use clap::CommandFactory;
use clap::FromArgMatches;
use colog::default_builder;
use colog::formatter;
use crab_lib::config::check_server_url;
use crab_lib::config::Config;
use crab_lib::constants::CONFIG_FILE;
use crab_lib::constants::ERROR_STYLE;
use crab_lib::ctx;
use crab_lib::error::CrabError;
use crab_lib::file_system::FileSystemInteractor;
use crab_lib::logging::TaskLog;
use crab_lib::work_area::WorkAreaManager;
use log::debug;
use log::trace;
use log::LevelFilter;

use super::commands::apply_registry;
use super::log::LogTokens;
use super::printing::format_report;
use super::printing::get_styles;
use super::printing::print_version;
use crate::cli::def::Cli;
use crate::cli::def::CrabCommand;
use crate::create::create_task;
use crate::remake::remake_tasks;
use crate::remake::RemakeStatus;
use crate::rest::get_server_info;
use crate::rest::interactor::HttpsRest;
use crate::rest::server_url;
use crate::upload::upload_log_file;
use crate::upload::LogUpload;

/// This function parses command that crab was run with.
pub fn parse_command() -> ExitCode {
    let styled = apply_registry(Cli::command().styles(get_styles())).get_matches();

    let command = match Cli::from_arg_matches(&styled) {
        Ok(command) => command,
        Err(e) => e.exit(),
    };

    // https://github.com/rust-lang/rust/blob/master/library/std/src/backtrace.rs
    let backtrace_enabled = match env::var("RUST_LIB_BACKTRACE") {
        Ok(s) => s != "0",
        Err(_) => match env::var("RUST_BACKTRACE") {
            Ok(s) => s != "0",
            Err(_) => false,
        },
    };

    match process_command(&command) {
        Ok(code) => code,
        Err(e) if backtrace_enabled => {
            eprintln!("{e:?}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}error:{:#} {}", ERROR_STYLE, ERROR_STYLE, e.root_cause());
            eprint!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// CLAP has parsed the command, now we process it.
pub fn process_command(cmd: &Cli) -> Result<ExitCode> {
    setup_logging(cmd)?;

    let file_system = FileSystemInteractor { dry_run: cmd.dry };

    let mut config = read_config(cmd, &file_system)?;
    let manager = WorkAreaManager::from_env(&file_system)?;
    let mut log = TaskLog::new();

    match &cmd.command {
        CrabCommand::Remake(args) => {
            let target = config.target()?;
            let report = remake_tasks(args.cmptask.as_deref(), &manager, &target, &log)?;

            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).with_context(ctx!(
                      "Could not print the outcome", ;
                      "",
                    ))?
                );
            } else {
                println!("{}", format_report(&report, cmd.script));
            }

            if report.status == RemakeStatus::Failed {
                return Ok(ExitCode::FAILURE);
            }
        }

        CrabCommand::Create(args) => {
            create_task(
                args,
                &config,
                &manager,
                &file_system,
                &mut log,
                Local::now(),
            )?;
        }

        CrabCommand::ServerInfo(args) => {
            let target = config.target()?;
            let rest = HttpsRest::new(config.credential_path(), file_system);
            let base_url = server_url(&target.instance, "info")?;

            let info = get_server_info(&rest, &args.subresource, &target.server, &base_url, &[])?;

            println!(
                "{}",
                serde_json::to_string_pretty(&info).with_context(ctx!(
                  "Could not print the server information", ;
                  "",
                ))?
            );
        }

        CrabCommand::UploadLog(args) => {
            let log_path = match &args.task {
                Some(task) => {
                    let (record, log_path) = manager.load(task, &mut log)?;

                    // the task is served where it was submitted
                    config.instance = record.instance;
                    config.server_url = Some(if record.port.is_empty() {
                        record.server
                    } else {
                        format!("{}:{}", record.server, record.port)
                    });

                    Some(log_path)
                }
                None => None,
            };

            let rest = HttpsRest::new(config.credential_path(), file_system);
            let upload = LogUpload {
                log_name: args.log_name.clone(),
                log_path,
            };

            match upload_log_file(&rest, &log, &upload, &config, manager.cwd(), Local::now()) {
                Some(url) => println!("{url}"),
                None => log.error("The log file was not uploaded, rerun with -v to see why"),
            }
        }

        CrabCommand::Version => print_version(cmd.script),
    }

    Ok(ExitCode::SUCCESS)
}

/// Read the client configuration and apply the command line overrides.
fn read_config(cmd: &Cli, fs: &FileSystemInteractor) -> Result<Config> {
    let path = cmd
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    debug!("Reading the config: {path:?}");

    let mut config = Config::load(&path, cmd.config.is_some(), fs)?;

    if let Some(instance) = &cmd.instance {
        config.instance = instance.clone();
    }

    if let Some(url) = &cmd.server_url {
        check_server_url(url)?;
        config.server_url = Some(url.clone());
    }

    if let Some(proxy) = &cmd.proxy {
        config.credential = Some(proxy.clone());
    }

    trace!("The config is: {config:#?}");

    Ok(config)
}

/// Set up the console logger for the verbosity asked for.
fn setup_logging(cmd: &Cli) -> Result<()> {
    let mut log_build = default_builder();
    log_build.format(formatter(LogTokens { plain: cmd.script }));

    match cmd.verbose {
        0 => log_build.filter(None, LevelFilter::Info),
        1 => log_build.filter(None, LevelFilter::Debug),
        2 => log_build.filter(None, LevelFilter::Trace),
        _ => {
            return Err(CrabError::Configuration(
                "Only two levels of verbosity supported (ie. -vv)".to_string(),
            ))
            .with_context(ctx!(
              "Could not set up logging", ;
              "",
            ))
        }
    };

    log_build.try_init().with_context(ctx!(
      "Failed to initialize the command line interface", ;
      "Make sure you are using a supported terminal",
    ))?;

    Ok(())
}
