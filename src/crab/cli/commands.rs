use clap::Command;
use crab_lib::plugins::CatalogEntry;
use crab_lib::plugins::PluginRegistry;

/// How a command is presented on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    /// Other names the command answers to.
    pub short_names: &'static [&'static str],

    /// Whether the command is listed in the help.
    pub visible: bool,
}

impl CommandInfo {
    /// A listed command.
    const fn visible(short_names: &'static [&'static str]) -> Self {
        Self {
            short_names,
            visible: true,
        }
    }

    /// A command that works but is not listed.
    const fn hidden() -> Self {
        Self {
            short_names: &[],
            visible: false,
        }
    }
}

/// Every command compiled into the client.
pub fn catalog() -> Vec<CatalogEntry<CommandInfo>> {
    vec![
        CatalogEntry::new("SubCommand", CommandInfo::hidden()),
        CatalogEntry::new("remake", CommandInfo::visible(&["rmk"])),
        CatalogEntry::new("create", CommandInfo::visible(&[])),
        CatalogEntry::new("upload-log", CommandInfo::visible(&["uploadlog"])),
        CatalogEntry::new("server-info", CommandInfo::hidden()),
        CatalogEntry::new("version", CommandInfo::visible(&[])),
    ]
}

/// The commands offered to the user.
pub fn available_commands() -> PluginRegistry<CommandInfo> {
    PluginRegistry::load(&catalog(), &["SubCommand"]).filter(|p| p.handle.visible)
}

/// Give the subcommands of `cmd` the aliases of their registry entries and
/// hide the ones that are not offered.
pub fn apply_registry(cmd: Command) -> Command {
    let available = available_commands();

    let names: Vec<String> = cmd
        .get_subcommands()
        .map(|sub| sub.get_name().to_string())
        .collect();

    names.iter().fold(cmd, |cmd, name| {
        let entry = available.get(name).map(|plugin| plugin.handle);

        cmd.mut_subcommand(name, |sub| match entry {
            Some(info) => sub.visible_aliases(info.short_names.iter().copied()),
            None => sub.hide(true),
        })
    })
}

#[cfg(test)]
#[path = "tests/commands.rs"]
mod tests;
