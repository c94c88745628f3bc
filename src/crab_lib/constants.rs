use anstyle::AnsiColor;
use anstyle::Color;
use anstyle::Style;

/// The client configuration read when none is given explicitly.
pub const CONFIG_FILE: &str = "crab.toml";

/// The name of the cache file inside every work area.
pub const CACHE_FILE: &str = ".requestcache";

/// The version of the cache file layout written by this client.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// The name of the log file inside every work area.
pub const LOG_FILE: &str = "crab.log";

/// The folder in a work area that receives job outputs.
pub const RESULTS_FOLDER: &str = "results";

/// The folder in a work area that holds the task's input sandbox.
pub const INPUTS_FOLDER: &str = "inputs";

/// Every request name starts with this.
pub const REQUEST_PREFIX: &str = "crab_";

/// The timestamp appended to generated request names.
pub const REQUEST_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// The timestamp prefixed to generated log upload names.
pub const LOG_UPLOAD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// Overrides the base directory of new work areas.
pub const WORKING_AREA_ENV: &str = "CRAB_WORKING_AREA";

/// Path to the proxy certificate, if set.
pub const PROXY_ENV: &str = "X509_USER_PROXY";

/// The root of every server resource.
pub const BASE_URL: &str = "/crabserver/";

/// The instance name used when an explicit server url is given.
pub const PRIVATE_INSTANCE: &str = "private";

/// The instance private servers are addressed as.
pub const PRIVATE_INSTANCE_ALIAS: &str = "dev";

/// The instance used when none is configured.
pub const INSTANCE_DEFAULT: fn() -> String = || "prod".to_string();

/// The known server deployments and their hosts.
pub const SERVICE_INSTANCES: [(&str, &str); 3] = [
    ("prod", "cmsweb.cern.ch"),
    ("preprod", "cmsweb-testbed.cern.ch"),
    ("dev", "cmsweb-dev.cern.ch"),
];

/// Structural pattern of a complete task name.
pub const TASK_NAME_PATTERN: &str = r"^\d{6}_\d{6}_([^:,]+):[a-zA-Z]+_crab_.+$";

/// Structural pattern of a job id list, ids and `first-last` ranges.
pub const JOB_IDS_PATTERN: &str = r"^\d+(-\d+)?(,\d+(-\d+)?)*$";

/// Create a style with a defined foreground color.
pub const fn style_from_fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// The styling for the program name.
pub const PRIMARY_STYLE: Style = style_from_fg(AnsiColor::Green).bold();

/// The styling for error messages.
pub const ERROR_STYLE: Style = style_from_fg(AnsiColor::Red).bold();

/// The styling for warnings.
pub const WARNING_STYLE: Style = style_from_fg(AnsiColor::Yellow).bold();

/// The styling for help messages.
pub const HELP_STYLE: Style = style_from_fg(AnsiColor::Green).bold().underline();

/// Look up the host of a known instance.
pub fn instance_host(instance: &str) -> Option<&'static str> {
    SERVICE_INSTANCES
        .iter()
        .find(|(name, _)| *name == instance)
        .map(|(_, host)| *host)
}

/// The names of all known instances, for error messages.
pub fn instance_names() -> String {
    SERVICE_INSTANCES
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}
