// Command-line interface for roampub
//
// This binary turns a PageDump export (a JSON array of vertex records) into a
// published document. The heavy lifting lives in roam-babel; this crate only
// wires files, configuration and logging around it.
//
// Converting:
//
// The source format is detected from the file extension (`.json` is a
// PageDump) and can be forced with --from. The target defaults to the
// configured `convert.format`.
// Usage:
//  roampub <dump.json> [--to <format>] [--from <format>] [--output <file>]  - Convert (default)
//  roampub convert <dump.json> [--to <format>] ...                          - Same as above (explicit)
//  roampub validate <dump.json>                                             - Check graph invariants
//  roampub inspect <dump.json>                                              - Summarize the graph
//  roampub --list-formats                                                   - List available formats
//
// Extra Parameters:
//
// Settings can be overridden with --extra-<parameter-name> <value>.
// Known keys (normalize, breaks, html, validate) update the configuration;
// anything else is handed to the target format as an option.
// Example:
//  roampub dump.json --to tokens --extra-breaks false

use clap::{Arg, ArgAction, Command, ValueHint};
use roam_babel::{
    publish, FormatRegistry, Graph, PublishArtifact, PublishError, PublishSpec, ValidationFailure,
};
use roam_config::{Loader, PublishConfig};
use std::collections::HashMap;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "validate", "inspect", "help"];

/// Formats whose output depends on the tokenizer settings.
const TOKENIZING_FORMATS: &[&str] = &["commonmark", "tokens"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = i + 1 < args.len() && !args[i + 1].starts_with('-');

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("roampub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Publish PageDump exports as Markdown and CommonMark tokens")
        .long_about(
            "roampub reads a PageDump export (a JSON array of vertex records),\n\
            checks it against the graph invariants and publishes it.\n\n\
            Commands:\n  \
            - convert:  Publish a dump in another format (default command)\n  \
            - validate: Report every broken graph invariant\n  \
            - inspect:  Summarize the vertices of a dump\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            roampub dump.json                          # Markdown to stdout\n  \
            roampub dump.json --to tokens              # CommonMark token stream as JSON\n  \
            roampub dump.json --extra-validate false   # Skip validation\n  \
            roampub validate dump.json                 # Check the graph only",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a roampub.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Publish a PageDump in another format (default command)")
                .long_about(
                    "Publish a PageDump export.\n\n\
                    Supported target formats:\n  \
                    - markdown:   Markdown document (.md)\n  \
                    - commonmark: Markdown re-rendered from the token stream\n  \
                    - tokens:     CommonMark token stream as JSON\n\n\
                    The graph is validated first unless convert.validate is false.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (defaults to convert.format)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a PageDump against the graph invariants")
                .arg(
                    Arg::new("path")
                        .help("Path to the PageDump file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print vertex counts per type and the root title")
                .arg(
                    Arg::new("path")
                        .help("Path to the PageDump file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    init_tracing(&config.log.level);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => {
                    let registry = FormatRegistry::default();
                    match registry.detect_format_from_filename(input) {
                        Some(detected) => detected,
                        None => {
                            eprintln!("Error: Could not detect format from filename '{input}'");
                            eprintln!("Please specify --from explicitly");
                            std::process::exit(1);
                        }
                    }
                }
            };
            let to = sub_matches
                .get_one::<String>("to")
                .cloned()
                .unwrap_or_else(|| config.convert.format.clone());
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, &to, output, &extra_params, &config);
        }
        Some(("validate", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            handle_validate_command(path);
        }
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            handle_inspect_command(path);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_graph(path: &str, from: &str) -> Graph {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    let registry = FormatRegistry::default();
    registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    })
}

fn report_failures(failures: &[ValidationFailure]) {
    for failure in failures {
        eprintln!("{failure}");
    }
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &PublishConfig,
) {
    let registry = FormatRegistry::default();
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let graph = read_graph(input, from);
    let format_options = build_format_params(to, config, extra_params);
    debug!(from, to, options = ?format_options, "converting");

    let mut spec = PublishSpec::new(&graph, to)
        .with_validation(config.convert.validate)
        .with_options(format_options);
    if let Some(path) = output {
        spec = spec.with_output_path(path);
    }

    match publish(spec) {
        Ok(PublishArtifact::InMemory(text)) => print!("{text}"),
        Ok(PublishArtifact::File(path)) => debug!(path = %path.display(), "written"),
        Err(PublishError::Invalid(failures)) => {
            report_failures(&failures);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle the validate command
fn handle_validate_command(path: &str) {
    let graph = read_graph(path, "pagedump");
    match roam_babel::validate(&graph) {
        None => println!("ok"),
        Some(failures) => {
            report_failures(&failures);
            std::process::exit(1);
        }
    }
}

/// Handle the inspect command
fn handle_inspect_command(path: &str) {
    let graph = read_graph(path, "pagedump");

    match graph.root_page() {
        Some(page) => println!("title: {}", page.title),
        None => println!("title: (no root page)"),
    }
    println!("vertices: {}", graph.len());
    for (vertex_type, count) in graph.vertex_type_counts() {
        println!("  {vertex_type}: {count}");
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        if let Ok(format) = registry.get(&format_name) {
            let mut modes = Vec::new();
            if format.supports_parsing() {
                modes.push("parse");
            }
            if format.supports_serialization() {
                modes.push("serialize");
            }
            println!(
                "  {format_name:<12} {} [{}]",
                format.description(),
                modes.join(", ")
            );
        }
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> PublishConfig {
    let loader = Loader::new().with_optional_file("roampub.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(
    config: &mut PublishConfig,
    extra_params: &mut HashMap<String, String>,
) {
    if let Some(raw) = extra_params.remove("normalize") {
        config.tokenize.normalize = parse_bool_arg("normalize", &raw);
    }
    if let Some(raw) = extra_params.remove("breaks") {
        config.tokenize.breaks = parse_bool_arg("breaks", &raw);
    }
    if let Some(raw) = extra_params.remove("html") {
        config.tokenize.html = parse_bool_arg("html", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["validate", "validation"]) {
        config.convert.validate = parse_bool_arg("validate", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["log", "log-level"]) {
        config.log.level = raw;
    }
}

/// Options handed to the target format: tokenizer settings for the formats
/// that tokenize, plus any extras the configuration did not claim.
fn build_format_params(
    to: &str,
    config: &PublishConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = if TOKENIZING_FORMATS.contains(&to) {
        config.tokenize.to_params()
    } else {
        HashMap::new()
    };

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
