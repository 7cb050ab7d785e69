// Command-line interface for md-sieve
//
// This binary renders Markdown through the allow-list pipeline and lets you inspect the effective
// allow-list for a parser/theme pair.
//
// Rendering:
//
// The parser defaults to `parser.default` from the configuration; a theme is only active when
// named. Input "-" reads stdin.
// Usage:
//  md-sieve <input> [--parser <id>] [--theme <id>] [-o <file>] [--json]         - Render (default)
//  md-sieve render <input> ...                                                   - Same as above (explicit)
//  md-sieve allowed-html [--parser <id>] [--theme <id>] [--json]                 - Print the effective allow-list
//  md-sieve check <tag> [<attribute>] [--value <v>] [--parser <id>] [--theme <id>] - Query the allow-list
//  md-sieve --list-parsers | --list-providers
//
// Extra Parameters:
//
// Parser settings can be passed using --extra-<setting> [true|false]. The CLI layer strips the
// "extra-" prefix, turns dashes into underscores and applies the setting to the parser in use.
// Example:
//  md-sieve notes.md --extra-tables --extra-smart-punctuation false

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use md_sieve::{ParserId, Renderer, ThemeId};
use md_sieve_config::{Loader, SieveConfig};
use std::collections::HashMap;
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["render", "allowed-html", "check", "help"];

/// Extra keys taking a numeric value; every other key is a boolean switch
const VALUE_EXTRAS: &[&str] = &[
    "max-input-size",
    "max_input_size",
    "cache-max-entries",
    "cache_max_entries",
];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
///
/// A boolean switch only takes the next argument when it reads as a boolean, so
/// `--extra-tables notes.md` leaves `notes.md` as the input.
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
            let has_value = args.get(i + 1).is_some_and(|next| {
                if VALUE_EXTRAS.contains(&key) {
                    !next.starts_with('-')
                } else {
                    bool_literal(next).is_some()
                }
            });

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

fn parser_arg() -> Arg {
    Arg::new("parser")
        .long("parser")
        .short('p')
        .help("Parser id (defaults to parser.default from the configuration)")
        .value_hint(ValueHint::Other)
}

fn theme_arg() -> Arg {
    Arg::new("theme")
        .long("theme")
        .short('t')
        .help("Active theme id")
        .value_hint(ValueHint::Other)
}

fn json_arg(help: &'static str) -> Arg {
    Arg::new("json")
        .long("json")
        .help(help)
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("md-sieve")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render Markdown to HTML filtered by a merged allow-list")
        .long_about(
            "md-sieve renders Markdown with a pluggable parser and strips the resulting HTML\n\
            down to what the effective allow-list permits.\n\n\
            Commands:\n  \
            - render:       Render Markdown to sanitized HTML (default command)\n  \
            - allowed-html: Print the merged allow-list for a parser and theme\n  \
            - check:        Ask whether a tag or attribute is allowed\n\n\
            Extra Parameters:\n  \
            Use --extra-<setting> [value] to toggle parser settings.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            md-sieve notes.md                           # Render with the default parser\n  \
            md-sieve notes.md --parser extra -o out.html\n  \
            md-sieve notes.md --extra-tables            # Enable tables for this run\n  \
            md-sieve allowed-html --parser extra        # Show the effective allow-list\n  \
            md-sieve check a target --value _blank      # Exit code 0 if allowed, 2 if not",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-parsers")
                .long("list-parsers")
                .help("List available parsers")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("list-providers")
                .long("list-providers")
                .help("List allow-list providers in merge order")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an md-sieve.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Render Markdown to sanitized HTML (default command)")
                .long_about(
                    "Render a Markdown file and sanitize the HTML against the effective\n\
                    allow-list for the chosen parser and theme.\n\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    md-sieve render notes.md                     # Render (stdout)\n  \
                    md-sieve render notes.md --theme olivero     # With theme overrides\n  \
                    cat notes.md | md-sieve render -             # Read stdin\n  \
                    md-sieve notes.md                            # 'render' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path, or - for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(parser_arg())
                .arg(theme_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(json_arg("Print the rendering with its metadata as JSON")),
        )
        .subcommand(
            Command::new("allowed-html")
                .about("Print the effective allow-list")
                .long_about(
                    "Merge every applicable provider's contribution for a parser and theme\n\
                    and print the result.\n\n\
                    The text form lists each tag with its allowed attributes, value sets\n\
                    in quotes. --json prints the table itself.",
                )
                .arg(parser_arg())
                .arg(theme_arg())
                .arg(json_arg("Print the allow-list as JSON")),
        )
        .subcommand(
            Command::new("check")
                .about("Check whether a tag or attribute is allowed")
                .long_about(
                    "Query the effective allow-list.\n\n\
                    Prints 'allowed' and exits with 0, or prints 'denied' and exits with 2.\n\n\
                    Examples:\n  \
                    md-sieve check table --parser extra\n  \
                    md-sieve check a target --value _blank",
                )
                .arg(
                    Arg::new("tag")
                        .help("Tag name")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("attribute")
                        .help("Attribute name; omit to check the tag itself")
                        .index(2),
                )
                .arg(
                    Arg::new("value")
                        .long("value")
                        .help("Attribute value to check against value restrictions"),
                )
                .arg(parser_arg())
                .arg(theme_arg()),
        )
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file argument means "render"
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "render".to_string()];
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

    init_tracing(matches.get_flag("verbose"));

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    let sub_matches = matches.subcommand().map(|(_, sub)| sub);
    let parser = sub_matches
        .and_then(|sub| sub.try_get_one::<String>("parser").ok().flatten())
        .cloned()
        .unwrap_or_else(|| config.parser.default.clone());
    apply_config_overrides(&mut config, &parser, extra_params);
    tracing::debug!(%parser, themes = config.themes.len(), "Configuration loaded");

    let renderer = config.build_renderer().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    if matches.get_flag("list-parsers") {
        handle_list_parsers_command(&renderer);
        return ExitCode::SUCCESS;
    }
    if matches.get_flag("list-providers") {
        handle_list_providers_command(&renderer);
        return ExitCode::SUCCESS;
    }

    let parser = ParserId::new(parser);
    match matches.subcommand() {
        Some(("render", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let theme = theme_from(sub_matches);
            handle_render_command(
                &renderer,
                input,
                &parser,
                theme.as_ref(),
                output,
                sub_matches.get_flag("json"),
            );
            ExitCode::SUCCESS
        }
        Some(("allowed-html", sub_matches)) => {
            let theme = theme_from(sub_matches);
            handle_allowed_html_command(&renderer, &parser, theme.as_ref(), sub_matches.get_flag("json"));
            ExitCode::SUCCESS
        }
        Some(("check", sub_matches)) => {
            let tag = sub_matches.get_one::<String>("tag").expect("tag is required");
            let attribute = sub_matches.get_one::<String>("attribute").map(|s| s.as_str());
            let value = sub_matches
                .get_one::<String>("value")
                .map(|s| s.as_str())
                .unwrap_or("");
            let theme = theme_from(sub_matches);
            if handle_check_command(&renderer, &parser, theme.as_ref(), tag, attribute, value) {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            ExitCode::FAILURE
        }
    }
}

fn theme_from(matches: &ArgMatches) -> Option<ThemeId> {
    matches
        .get_one::<String>("theme")
        .map(|theme| ThemeId::new(theme.as_str()))
}

/// Handle the render command
fn handle_render_command(
    renderer: &Renderer,
    input: &str,
    parser: &ParserId,
    theme: Option<&ThemeId>,
    output: Option<&str>,
    json: bool,
) {
    let read = if input == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        fs::read_to_string(input)
    };
    let source = read.unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let rendered = renderer
        .render(&source, Some(parser), theme)
        .unwrap_or_else(|e| {
            eprintln!("Render error: {e}");
            std::process::exit(1);
        });

    let text = if json {
        serde_json::to_string_pretty(&rendered).unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        }) + "\n"
    } else {
        rendered.html
    };

    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{text}"),
    }
}

/// Handle the allowed-html command
fn handle_allowed_html_command(
    renderer: &Renderer,
    parser: &ParserId,
    theme: Option<&ThemeId>,
    json: bool,
) {
    let list = renderer.effective_allow_list(parser, theme);
    if json {
        let text = serde_json::to_string_pretty(list.as_ref()).unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });
        println!("{text}");
    } else {
        println!("{}", list.to_allowed_html());
    }
}

/// Handle the check command; true when allowed
fn handle_check_command(
    renderer: &Renderer,
    parser: &ParserId,
    theme: Option<&ThemeId>,
    tag: &str,
    attribute: Option<&str>,
    value: &str,
) -> bool {
    let list = renderer.effective_allow_list(parser, theme);
    // lists store names lowercase, as the HTML parser reports them
    let tag = tag.to_ascii_lowercase();
    let tag = tag.as_str();
    let attribute = attribute.map(str::to_ascii_lowercase);
    let allowed = match attribute.as_deref() {
        Some(attribute) => list.is_tag_allowed(tag) && list.is_attribute_allowed(tag, attribute, value),
        None => list.is_tag_allowed(tag),
    };
    println!("{}", if allowed { "allowed" } else { "denied" });
    allowed
}

/// Handle the list-parsers command
fn handle_list_parsers_command(renderer: &Renderer) {
    println!("Available parsers:\n");
    let parsers = renderer.parsers();
    for id in parsers.list_parsers() {
        match parsers.get(&id) {
            Ok(parser) => println!("  {id:<12} {}", parser.label()),
            Err(_) => println!("  {id}"),
        }
    }
}

/// Handle the list-providers command
fn handle_list_providers_command(renderer: &Renderer) {
    println!("Providers (merge order):\n");
    for provider in renderer.providers().ordered() {
        println!(
            "  {:>5}  {:<22} {}",
            provider
                .weight()
                .map_or_else(|| "-".to_string(), |weight| weight.to_string()),
            provider.id(),
            provider.label()
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> SieveConfig {
    let loader = Loader::new().with_optional_file("md-sieve.toml");
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

/// Fold --extra-* parameters into the configuration
///
/// `max-input-size`, `cache` and `cache-max-entries` are global; every other key is a setting of
/// `parser`.
fn apply_config_overrides(
    config: &mut SieveConfig,
    parser: &str,
    mut extra_params: HashMap<String, String>,
) {
    if let Some(raw) = take_override(&mut extra_params, &["max-input-size", "max_input_size"]) {
        config.parser.max_input_size = raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid size '{raw}' for --extra-max-input-size");
            std::process::exit(1);
        });
    }
    if let Some(raw) = take_override(&mut extra_params, &["cache"]) {
        config.cache.enabled = parse_bool_arg("cache", &raw);
    }
    if let Some(raw) = take_override(&mut extra_params, &["cache-max-entries", "cache_max_entries"])
    {
        config.cache.max_entries = raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid entry count '{raw}' for --extra-cache-max-entries");
            std::process::exit(1);
        });
    }

    for (key, raw) in extra_params {
        let value = parse_bool_arg(&key, &raw);
        config
            .parser
            .settings
            .entry(parser.to_string())
            .or_default()
            .insert(key.replace('-', "_"), value);
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn bool_literal(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    bool_literal(raw).unwrap_or_else(|| {
        eprintln!("Invalid boolean value '{raw}' for --extra-{flag}");
        std::process::exit(1);
    })
}
