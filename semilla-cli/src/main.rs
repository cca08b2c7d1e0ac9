//! Command-line interface for semilla
//! This binary tokenizes, highlights and republishes text through the semilla libraries.
//!
//! Usage:
//!   semilla tokens `<path>` [--lang `<lang>`] [--format json|simple|annotate] [--chunk `<n>`]
//!   semilla highlight `<path>` [--lang `<lang>`] [--config `<file>`] [--check-links]
//!   semilla errors `<log>` [--to html|json]
//!   semilla feed `<mbox>` [--to html|rows|mail|rss|json|index] [--order `<order>`] [--page `<n>`]
//!
//! Logging goes to stderr and is filtered through `RUST_LOG` (default: warn).

mod commands;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::{FeedRequest, Overrides, FEED_TARGETS, TOKEN_FORMATS};
use semilla_config::OrderBy;
use semilla_parser::lexing::Lang;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn path_arg(help: &'static str) -> Arg {
    Arg::new("path").help(help).required(true).index(1)
}

fn lang_arg() -> Arg {
    Arg::new("lang")
        .long("lang")
        .short('l')
        .help("Language of the input (default: guessed from the file name)")
        .value_parser(Lang::NAMES)
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("TOML file layered over the built-in configuration")
}

fn cli() -> Command {
    Command::new("semilla")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resumable tokenizers, markup decorators and post feeds")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .subcommand(
            Command::new("tokens")
                .about("Dump the tokens of a file")
                .arg(path_arg("File to tokenize"))
                .arg(lang_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(TOKEN_FORMATS.to_vec())
                        .default_value("json"),
                )
                .arg(
                    Arg::new("chunk")
                        .long("chunk")
                        .help("Feed the tokenizer buffers of this many bytes")
                        .value_parser(value_parser!(usize))
                        .default_value("4096"),
                ),
        )
        .subcommand(
            Command::new("highlight")
                .about("Decorate a file with HTML markup")
                .arg(path_arg("File to highlight"))
                .arg(lang_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("check-links")
                        .long("check-links")
                        .help("Classify href attributes of XML input instead of highlighting it")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("site-top")
                        .long("site-top")
                        .help("Prefix of site-relative links"),
                ),
        )
        .subcommand(
            Command::new("errors")
                .about("Collect the diagnostics of a compiler log")
                .arg(path_arg("Compiler output"))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Output format")
                        .value_parser(["html", "json"])
                        .default_value("html"),
                ),
        )
        .subcommand(
            Command::new("feed")
                .about("Republish the messages of a mailbox")
                .arg(path_arg("Mailbox to read"))
                .arg(config_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Output format")
                        .value_parser(FEED_TARGETS.to_vec())
                        .default_value("html"),
                )
                .arg(
                    Arg::new("order")
                        .long("order")
                        .short('o')
                        .help("Post order (default: feed.order)")
                        .value_parser(OrderBy::NAMES),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .help("Page to show, starting at 0")
                        .value_parser(value_parser!(usize))
                        .default_value("0"),
                )
                .arg(
                    Arg::new("page-length")
                        .long("page-length")
                        .help("Posts per page (default: feed.page_length)")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .help("Merge consecutive posts with the same guid")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("select")
                        .long("select")
                        .help("Only keep posts whose order key is one of these")
                        .value_delimiter(','),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("Channel title of RSS output")
                        .default_value("semilla"),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = match cli().get_matches().subcommand() {
        Some(("tokens", matches)) => handle_tokens_command(matches),
        Some(("highlight", matches)) => handle_highlight_command(matches),
        Some(("errors", matches)) => handle_errors_command(matches),
        Some(("feed", matches)) => handle_feed_command(matches),
        _ => unreachable!("clap requires a subcommand"),
    };

    let written = output.and_then(|bytes| {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&bytes)
            .and_then(|_| stdout.flush())
            .map_err(|e| format!("Cannot write output: {e}"))
    });
    if let Err(message) = written {
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn lang(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>("lang").map(String::as_str)
}

fn handle_tokens_command(matches: &ArgMatches) -> Result<Vec<u8>, String> {
    let path = string(matches, "path").unwrap_or_default();
    let format = string(matches, "format").unwrap_or_default();
    let chunk = matches.get_one::<usize>("chunk").copied().unwrap_or(4096);
    commands::tokens(&path, lang(matches), &format, chunk)
}

fn handle_highlight_command(matches: &ArgMatches) -> Result<Vec<u8>, String> {
    let path = string(matches, "path").unwrap_or_default();
    let mut overrides = Overrides::new();
    if matches.get_flag("check-links") {
        overrides.push(("links.check", "true".to_string()));
    }
    if let Some(site_top) = string(matches, "site-top") {
        overrides.push(("links.site_top", site_top));
    }
    let config = commands::load_config(
        matches.get_one::<String>("config").map(String::as_str),
        overrides,
    )?;
    commands::highlight(&path, lang(matches), &config)
}

fn handle_errors_command(matches: &ArgMatches) -> Result<Vec<u8>, String> {
    let path = string(matches, "path").unwrap_or_default();
    let to = string(matches, "to").unwrap_or_default();
    commands::errors(&path, &to)
}

fn handle_feed_command(matches: &ArgMatches) -> Result<Vec<u8>, String> {
    let path = string(matches, "path").unwrap_or_default();
    let mut overrides = Overrides::new();
    if let Some(order) = string(matches, "order") {
        overrides.push(("feed.order", order));
    }
    if let Some(length) = matches.get_one::<usize>("page-length") {
        overrides.push(("feed.page_length", length.to_string()));
    }
    if matches.get_flag("compact") {
        overrides.push(("feed.compact", "true".to_string()));
    }
    let config = commands::load_config(
        matches.get_one::<String>("config").map(String::as_str),
        overrides,
    )?;
    let request = FeedRequest {
        to: string(matches, "to").unwrap_or_default(),
        page: matches.get_one::<usize>("page").copied().unwrap_or_default(),
        select: matches
            .get_many::<String>("select")
            .map(|keys| keys.cloned().collect())
            .unwrap_or_default(),
        title: string(matches, "title").unwrap_or_default(),
    };
    commands::feed(&path, &config, &request)
}
