use std::env;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use chrono::DateTime;
use chrono::Local;

use crate::cache;
use crate::cache::CacheRecord;
use crate::constants::CACHE_FILE;
use crate::constants::ERROR_STYLE;
use crate::constants::INPUTS_FOLDER;
use crate::constants::PRIMARY_STYLE;
use crate::constants::REQUEST_PREFIX;
use crate::constants::REQUEST_TIMESTAMP_FORMAT;
use crate::constants::RESULTS_FOLDER;
use crate::constants::WARNING_STYLE;
use crate::constants::WORKING_AREA_ENV;
use crate::ctx;
use crate::error::CrabError;
use crate::file_system::FileOperations;
use crate::logging::TaskLog;
use crate::task_name::TaskName;

/// A freshly created work area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkArea {
    /// The folder of the work area.
    pub path: PathBuf,

    /// The name of the request, also the name of the folder.
    pub request_name: String,

    /// The `crab.log` of the work area.
    pub log_path: PathBuf,
}

/// Where a request is served from, as recorded in its cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTarget {
    /// The server host.
    pub server: String,

    /// The server deployment.
    pub instance: String,
}

/// Creates, remakes and loads work areas relative to one directory.
#[derive(Debug)]
pub struct WorkAreaManager<'a, F: FileOperations> {
    /// The file system to work on.
    fs: &'a F,

    /// The directory the client runs in.
    cwd: PathBuf,

    /// The base directory for new work areas from the environment.
    env_area: Option<PathBuf>,
}

/// Build the name of a new request.
///
/// Without a name the current time is used. A name containing a path
/// separator is refused, the location of a task is chosen with its work area.
pub fn request_name(explicit: Option<&str>, now: DateTime<Local>) -> Result<String> {
    match explicit {
        None | Some("") => Ok(format!(
            "{REQUEST_PREFIX}{}",
            now.format(REQUEST_TIMESTAMP_FORMAT)
        )),

        Some(name) if name.contains('/') => Err(CrabError::Configuration(format!(
            "The \"/\" character is not accepted in the request name {name:?}"
        )))
        .with_context(ctx!(
          "Could not create a request named {name:?}", ;
          "If you meant to choose where the task is stored, use the work area option instead",
        )),

        Some(name) => Ok(format!("{REQUEST_PREFIX}{name}")),
    }
}

impl<'a, F: FileOperations> WorkAreaManager<'a, F> {
    /// A manager rooted at `cwd`, with an optional base for new work areas.
    pub fn new(fs: &'a F, cwd: PathBuf, env_area: Option<PathBuf>) -> Self {
        Self { fs, cwd, env_area }
    }

    /// A manager for the process' current directory and environment.
    pub fn from_env(fs: &'a F) -> Result<Self> {
        let cwd = env::current_dir().with_context(ctx!(
          "Could not determine the current directory", ;
          "Ensure that it still exists",
        ))?;

        Ok(Self::new(
            fs,
            cwd,
            env::var_os(WORKING_AREA_ENV).map(PathBuf::from),
        ))
    }

    /// The directory the client runs in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The directory new work areas are made in.
    ///
    /// An unset base, or `.`, means the [WORKING_AREA_ENV] directory if set,
    /// and the current directory otherwise.
    pub fn base_folder(&self, base: Option<&Path>) -> PathBuf {
        match base {
            None => self.env_or_cwd(),
            Some(p) if p == Path::new(".") => self.env_or_cwd(),
            Some(p) => self.cwd.join(p),
        }
    }

    fn env_or_cwd(&self) -> PathBuf {
        match &self.env_area {
            Some(area) => self.cwd.join(area),
            None => self.cwd.clone(),
        }
    }

    /// Create the work area of a new request.
    ///
    /// The work area must not exist yet, it is created together with its
    /// `results` and `inputs` folders and the log is moved into it.
    pub fn create(
        &self,
        base: Option<&Path>,
        name: Option<&str>,
        now: DateTime<Local>,
        log: &mut TaskLog,
    ) -> Result<WorkArea> {
        let request_name = request_name(name, now)?;

        let base = self.base_folder(base);
        if !base.exists() {
            self.fs.create_folder_all(&base)?;
        }

        let path = base.join(&request_name);

        if path.exists() {
            return Err(CrabError::DuplicateWorkArea(path.clone())).with_context(ctx!(
              "Cannot create the work area {path:?}", ;
              "Please change the request name in the config file",
            ));
        }

        self.fs.create_folder(&path)?;
        self.fs.create_folder(&path.join(RESULTS_FOLDER))?;
        self.fs.create_folder(&path.join(INPUTS_FOLDER))?;

        let log_path = log.redirect(&path);

        Ok(WorkArea {
            path,
            request_name,
            log_path,
        })
    }

    /// Recreate the local work area of a task that exists on the server.
    ///
    /// Returns [None] when the task already has a cache file, there is
    /// nothing to remake then. Missing folders are created, and if that is
    /// not possible the current directory is used as the work area instead.
    pub fn remake(
        &self,
        task: &TaskName,
        target: &ServerTarget,
        log: &TaskLog,
    ) -> Result<Option<CacheRecord>> {
        let mut area = self.cwd.join(&task.work_area);

        let cache_path = area.join(CACHE_FILE);
        if cache_path.exists() {
            log.info(format!(
                "{ERROR_STYLE}Error{ERROR_STYLE:#}: {cache_path:?} is not created because it still exists"
            ));
            return Ok(None);
        }

        if let Err(e) = self.make_folders(&area, log) {
            log.debug(format!("{e:#}"));
            log.warn(format!(
                "{WARNING_STYLE}Warning{WARNING_STYLE:#}: Failed to make the work area {area:?}, \
                using {:?} instead",
                self.cwd
            ));
            area = self.cwd.clone();

            let fallback = area.join(CACHE_FILE);
            if fallback.exists() {
                log.info(format!(
                    "{ERROR_STYLE}Error{ERROR_STYLE:#}: {fallback:?} already exists and is kept"
                ));
                return Ok(None);
            }
        }

        log.info(format!("Remaking the {CACHE_FILE} for {}", task.raw));

        let record = CacheRecord {
            server: target.server.clone(),
            port: String::new(),
            request_name: task.raw.clone(),
            vo_role: String::new(),
            vo_group: String::new(),
            instance: target.instance.clone(),
            original_config: toml::Table::new(),
        };

        let cache_path = area.join(CACHE_FILE);
        cache::write(&cache_path, &record, self.fs)?;

        log.info(format!(
            "{PRIMARY_STYLE}Success{PRIMARY_STYLE:#}: Finish making {cache_path:?}"
        ));

        Ok(Some(record))
    }

    /// Create whichever of the work area folders are missing.
    fn make_folders(&self, area: &Path, log: &TaskLog) -> Result<()> {
        if !area.exists() {
            log.info(format!("Remaking {area:?} folder"));
            self.fs.create_folder(area)?;
        }

        for sub in [RESULTS_FOLDER, INPUTS_FOLDER] {
            let folder = area.join(sub);
            if !folder.exists() {
                self.fs.create_folder(&folder)?;
            }
        }

        Ok(())
    }

    /// Split a task path into its work area folder and request name.
    ///
    /// The name is the last component of the path, trailing separators and
    /// `.` are ignored.
    pub fn locate(&self, task: &Path) -> (PathBuf, String) {
        let name = task
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .last()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .unwrap_or_default();

        (self.cwd.join(task), name)
    }

    /// Read the cache of an existing work area and move the log into it.
    ///
    /// Returns the cache record and the path of the log.
    pub fn load(&self, task: &Path, log: &mut TaskLog) -> Result<(CacheRecord, PathBuf)> {
        let (area, task_name) = self.locate(task);
        let cache_path = area.join(CACHE_FILE);

        if !area.is_dir() {
            return Err(CrabError::TaskNotFound(task_name)).with_context(ctx!(
              "There is no work area at {area:?}", ;
              "Check the task path, or recreate it with `crab remake`",
            ));
        }

        if !cache_path.is_file() {
            return Err(CrabError::CacheNotFound(task_name)).with_context(ctx!(
              "The work area {area:?} has no {CACHE_FILE}", ;
              "Recreate it with `crab remake`",
            ));
        }

        let log_path = log.redirect(&area);

        Ok((cache::read(&cache_path, self.fs)?, log_path))
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
