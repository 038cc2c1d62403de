// src/main.rs

mod app_logic;
mod core;

use crate::app_logic::{
    FileAction, InMemoryLocation, LocationOperations, Notification, NotificationSeverity,
    PlaygroundSession,
};
use crate::core::cdn::{self, COMPONENT_LIBRARY, DEFAULT_CDN};
use crate::core::{
    ConfigManagerOperations, CoreConfigManager, OutputMode, PassthroughCompiler,
    PlaygroundOptions, TemplateCdn,
};
use clap::{Parser, ValueEnum};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputMode {
    Preview,
    Js,
    Css,
    Ssr,
}

impl From<CliOutputMode> for OutputMode {
    fn from(mode: CliOutputMode) -> Self {
        match mode {
            CliOutputMode::Preview => OutputMode::Preview,
            CliOutputMode::Js => OutputMode::Js,
            CliOutputMode::Css => OutputMode::Css,
            CliOutputMode::Ssr => OutputMode::Ssr,
        }
    }
}

/// Loads, edits and re-encodes shareable playground fragments.
#[derive(Debug, Parser)]
#[command(name = "cdx-playground", version)]
struct Args {
    /// Fragment to load, with or without the leading '#'.
    #[arg(long)]
    fragment: Option<String>,

    /// Change a package version after loading, as PKG=VERSION. Repeatable.
    #[arg(long = "set-version", value_parser = parse_package_version)]
    set_versions: Vec<(String, String)>,

    /// Create a new file, as NAME. Repeatable.
    #[arg(long = "add-file", value_name = "NAME")]
    add_files: Vec<String>,

    /// Write the contents of a local file into the playground, as
    /// NAME=PATH. Existing files keep their visibility. Repeatable.
    #[arg(long = "put-file", value_name = "NAME=PATH", value_parser = parse_name_pair)]
    put_files: Vec<(String, String)>,

    /// Rename a file, as OLD=NEW. Repeatable.
    #[arg(long = "rename", value_name = "OLD=NEW", value_parser = parse_name_pair)]
    renames: Vec<(String, String)>,

    /// Delete a file. Repeatable.
    #[arg(long = "delete-file", value_name = "NAME")]
    delete_files: Vec<String>,

    /// File whose compiled output is printed.
    #[arg(long, value_name = "NAME")]
    active: Option<String>,

    /// CDN to resolve packages from; the choice is remembered.
    #[arg(long)]
    cdn: Option<String>,

    /// Use development builds of the framework in the import map.
    #[arg(long)]
    development: bool,

    /// Which compiled output of the active file to print.
    #[arg(long, value_enum, default_value = "preview")]
    output_mode: CliOutputMode,

    /// Do not print any compiled output.
    #[arg(long)]
    no_output: bool,

    /// List the files in the playground.
    #[arg(long)]
    print_files: bool,

    /// Print the selectable component library versions from a saved
    /// jsdelivr package index response.
    #[arg(long, value_name = "FILE")]
    versions_index: Option<PathBuf>,

    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level '{raw}'"))
}

fn split_pair(raw: &str) -> Option<(String, String)> {
    match raw.split_once('=') {
        Some((left, right)) if !left.trim().is_empty() && !right.trim().is_empty() => {
            Some((left.trim().to_string(), right.trim().to_string()))
        }
        _ => None,
    }
}

fn parse_package_version(raw: &str) -> Result<(String, String), String> {
    split_pair(raw).ok_or_else(|| format!("expected PKG=VERSION, got '{raw}'"))
}

fn parse_name_pair(raw: &str) -> Result<(String, String), String> {
    split_pair(raw).ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

/*
 * Collects the file actions requested on the command line in a fixed order:
 * additions, writes, renames, deletions, then activation. A local file that
 * cannot be read is reported and skipped.
 */
fn collect_file_actions(args: &Args, failures: &mut Vec<Notification>) -> Vec<FileAction> {
    let mut actions: Vec<FileAction> = args
        .add_files
        .iter()
        .map(|name| FileAction::Add(name.clone()))
        .collect();
    for (name, local_path) in &args.put_files {
        match fs::read_to_string(local_path) {
            Ok(content) => actions.push(FileAction::Write {
                name: name.clone(),
                content,
            }),
            Err(e) => failures.push(Notification::error(format!(
                "Could not read {local_path} for {name}: {e}"
            ))),
        }
    }
    actions.extend(args.renames.iter().map(|(from, to)| FileAction::Rename {
        from: from.clone(),
        to: to.clone(),
    }));
    actions.extend(
        args.delete_files
            .iter()
            .map(|name| FileAction::Delete(name.clone())),
    );
    if let Some(name) = &args.active {
        actions.push(FileAction::Activate(name.clone()));
    }
    actions
}

fn resolve_cdn(args: &Args, config_manager: &dyn ConfigManagerOperations) -> String {
    if let Some(name) = &args.cdn {
        if let Err(e) = config_manager.save_cdn_setting(name) {
            log::warn!("Main: Could not remember CDN choice: {e}");
        }
        return name.clone();
    }
    match config_manager.load_cdn_setting() {
        Ok(Some(name)) => name,
        Ok(None) => DEFAULT_CDN.to_string(),
        Err(e) => {
            log::warn!("Main: Could not read CDN setting, using {DEFAULT_CDN}: {e}");
            DEFAULT_CDN.to_string()
        }
    }
}

fn print_selectable_versions(index_file: &PathBuf) -> bool {
    log::debug!(
        "Main: Reading package index saved from {}",
        cdn::versions_index_url(COMPONENT_LIBRARY)
    );
    let body = match fs::read_to_string(index_file) {
        Ok(body) => body,
        Err(e) => {
            eprintln!("Could not read {}: {e}", index_file.display());
            return false;
        }
    };
    match cdn::parse_versions_index(&body) {
        Ok(versions) => {
            for version in cdn::selectable_component_versions(versions) {
                println!("{version}");
            }
            true
        }
        Err(e) => {
            eprintln!("Could not parse {}: {e}", index_file.display());
            false
        }
    }
}

fn print_output(session: &PlaygroundSession) {
    let options = session.options();
    if !options.show_output {
        return;
    }
    let files = session.files();
    let compiled = files
        .get(files.active_file())
        .and_then(|record| record.compiled.as_ref());
    match options.output_mode {
        OutputMode::Preview => match session.import_map().to_json_pretty() {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Main: Could not render import map: {e}"),
        },
        OutputMode::Js => println!("{}", compiled.map(|c| c.js.as_str()).unwrap_or_default()),
        OutputMode::Css => println!("{}", compiled.map(|c| c.css.as_str()).unwrap_or_default()),
        OutputMode::Ssr => println!("{}", compiled.map(|c| c.ssr.as_str()).unwrap_or_default()),
    }
    if let Some(output) = compiled {
        for error in &output.errors {
            eprintln!("{error}");
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = TermLogger::init(
        args.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {e}");
    }

    if let Some(index_file) = &args.versions_index {
        return if print_selectable_versions(index_file) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let config_manager = CoreConfigManager::default();
    let cdn_name = resolve_cdn(&args, &config_manager);
    let options = PlaygroundOptions {
        cdn: cdn_name.clone(),
        production_mode: !args.development,
        show_output: !args.no_output,
        output_mode: args.output_mode.into(),
        ..Default::default()
    };

    let location = Arc::new(InMemoryLocation::new(
        args.fragment.as_deref().unwrap_or_default(),
    ));
    let mut session = PlaygroundSession::new(
        options,
        Arc::new(PassthroughCompiler::new()),
        Arc::new(TemplateCdn::new(&cdn_name)),
        Arc::clone(&location) as Arc<dyn LocationOperations>,
    );

    for (package, version) in &args.set_versions {
        if session.set_version(package, version) {
            log::info!("Main: {package} is now at {version}.");
        }
    }
    let mut failures = Vec::new();
    for action in collect_file_actions(&args, &mut failures) {
        session.perform(&action);
    }
    session.commit();

    let mut failed = false;
    for notification in failures.into_iter().chain(session.take_notifications()) {
        failed |= notification.severity == NotificationSeverity::Error;
        eprintln!("{notification}");
    }

    if args.print_files {
        let files = session.files();
        for record in files.iter() {
            let mut markers = Vec::new();
            if record.hidden {
                markers.push("hidden");
            }
            if record.path == files.main_file() {
                markers.push("main");
            }
            if record.path == files.active_file() {
                markers.push("active");
            }
            if markers.is_empty() {
                println!("{}", record.path);
            } else {
                println!("{} ({})", record.path, markers.join(", "));
            }
        }
    }
    print_output(&session);
    println!("{}", location.current());

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
