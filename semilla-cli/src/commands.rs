//! Command handlers
//!
//! Each handler reads its input, runs one library pass over it and returns the bytes to
//! print. Failures come back as messages; `main` reports them and sets the exit status.

use regex::Regex;
use semilla_config::{HtmlLayout, Loader, OrderBy, SemillaConfig};
use semilla_parser::decorating::{highlighter, DirLookup, HighlightOptions, LinkContext};
use semilla_parser::lexing::{annotate_lang, tokenize_lang, DiagnosticTokenizer, Lang};
use semilla_parser::listeners::ErrorTable;
use semilla_posts::filters::{Everything, KeyCounts};
use semilla_posts::{
    Collect, HtmlWriter, JsonLinesWriter, MailWriter, MboxReader, Policy, PolicyExt, PostError,
    PostFilter, Retained, RssWriter, ValidOnly,
};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};

/// Output formats of `semilla tokens`.
pub const TOKEN_FORMATS: &[&str] = &["json", "simple", "annotate"];

/// Targets of `semilla feed`.
pub const FEED_TARGETS: &[&str] = &["html", "rows", "mail", "rss", "json", "index"];

/// Key/value pairs set from the command line, applied over the configuration files.
pub type Overrides = Vec<(&'static str, String)>;

pub fn load_config(file: Option<&str>, overrides: Overrides) -> Result<SemillaConfig, String> {
    let mut loader = Loader::new();
    if let Some(file) = file {
        loader = loader.with_file(file);
    }
    for (key, value) in overrides {
        loader = loader
            .set_override(key, value)
            .map_err(|e| format!("Invalid setting for {key}: {e}"))?;
    }
    loader
        .build()
        .map_err(|e| format!("Failed to load configuration: {e}"))
}

fn read(path: &str) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("Cannot read {path}: {e}"))
}

fn lang_for(path: &str, lang: Option<&str>) -> Result<Lang, String> {
    match lang {
        Some(name) => name.parse().map_err(|e| format!("{e}")),
        None => Lang::from_path(path).ok_or_else(|| {
            format!(
                "Cannot tell the language of {path}; pass --lang ({})",
                Lang::NAMES.join(", ")
            )
        }),
    }
}

/// `semilla tokens`: dumps the tokens of a file.
pub fn tokens(
    path: &str,
    lang: Option<&str>,
    format: &str,
    chunk: usize,
) -> Result<Vec<u8>, String> {
    let input = read(path)?;
    let lang = lang_for(path, lang)?;
    debug!(%lang, format, chunk, "tokenizing");
    match format {
        "json" => {
            let lexemes = tokenize_lang(lang, &input, chunk);
            let mut json = serde_json::to_string_pretty(&lexemes)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            json.push('\n');
            Ok(json.into_bytes())
        }
        "simple" => {
            let mut out = String::new();
            for lexeme in tokenize_lang(lang, &input, chunk) {
                let _ = writeln!(out, "{} {:?}", lexeme.kind, lexeme.text);
            }
            Ok(out.into_bytes())
        }
        "annotate" => annotate_lang(lang, &input, chunk, Vec::new())
            .map_err(|e| format!("Annotation failed: {e}")),
        other => Err(format!(
            "Format '{other}' not supported; available formats: {}",
            TOKEN_FORMATS.join(", ")
        )),
    }
}

/// `semilla highlight`: decorates a file with markup.
pub fn highlight(
    path: &str,
    lang: Option<&str>,
    config: &SemillaConfig,
) -> Result<Vec<u8>, String> {
    let input = read(path)?;
    let lang = lang_for(path, lang)?;
    let identifier_style = match &config.cpp.identifier_style {
        Some(style) => Some(
            Regex::new(style).map_err(|e| format!("Invalid cpp.identifier_style: {e}"))?,
        ),
        None => None,
    };
    let options = HighlightOptions {
        escape: config.highlight.escape,
        identifier_style,
        check_links: config.links.check,
    };
    let root = Path::new(path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let links = LinkContext::new(config.links.site_top.clone(), DirLookup::new(root));

    let mut decorator = highlighter(lang, &options, &links);
    let mut body = Vec::new();
    decorator
        .decorate(&input, &mut body)
        .and_then(|_| decorator.finish(&mut body))
        .map_err(|e| format!("Highlighting failed: {e}"))?;
    debug!(%lang, links = ?links.links(), "highlighted");

    if decorator.formatted() && config.highlight.wrap_pre {
        let mut out = b"<pre>".to_vec();
        out.extend_from_slice(&body);
        out.extend_from_slice(b"</pre>\n");
        Ok(out)
    } else {
        Ok(body)
    }
}

/// `semilla errors`: collects the diagnostics of a compiler log.
pub fn errors(path: &str, to: &str) -> Result<Vec<u8>, String> {
    let input = read(path)?;
    let mut table = ErrorTable::new();
    DiagnosticTokenizer::new().tokenize_all(&input, &mut table);
    table.close();
    info!(diagnostics = table.rows().len(), "log read");
    match to {
        "json" => serde_json::to_string_pretty(table.rows())
            .map(|json| format!("{json}\n").into_bytes())
            .map_err(|e| format!("JSON serialization failed: {e}")),
        "html" => {
            let mut out = b"<table>\n".to_vec();
            table
                .write_html(&mut out)
                .map_err(|e| format!("Writing the table failed: {e}"))?;
            out.extend_from_slice(b"</table>\n");
            Ok(out)
        }
        other => Err(format!(
            "Target '{other}' not supported; available targets: html, json"
        )),
    }
}

/// Options of `semilla feed` that are not part of the configuration.
#[derive(Debug, Default)]
pub struct FeedRequest {
    pub to: String,
    pub page: usize,
    pub select: Vec<String>,
    pub title: String,
}

fn policy(config: &SemillaConfig, request: &FeedRequest) -> Box<dyn Policy> {
    let order: OrderBy = config.feed.order;
    let mut policy: Box<dyn Policy> = Box::new(Everything.ordered(order));
    if config.feed.compact {
        policy = Box::new(policy.compacted());
    }
    if !request.select.is_empty() {
        policy = Box::new(policy.selected(order, request.select.iter().cloned()));
    }
    Box::new(policy.paginated(request.page, config.feed.page_length))
}

/// Reads a mailbox through the valid-only and retained filters into `next`.
fn run(
    input: &[u8],
    policy: Box<dyn Policy>,
    next: &mut dyn PostFilter,
) -> Result<(), PostError> {
    let mut chain = ValidOnly::new(Retained::new(policy, next));
    let mut reader = MboxReader::new();
    reader.read_from(input, &mut chain)?;
    chain.flush()?;
    info!(
        messages = reader.messages(),
        dropped = chain.dropped(),
        "feed written"
    );
    Ok(())
}

/// `semilla feed`: turns a mailbox into a feed.
pub fn feed(path: &str, config: &SemillaConfig, request: &FeedRequest) -> Result<Vec<u8>, String> {
    let input = read(path)?;
    let policy = policy(config, request);
    let mut out = Vec::new();
    let failed = |e: PostError| format!("Feed failed: {e}");
    match request.to.as_str() {
        "html" | "rows" => {
            let layout = if request.to == "rows" {
                HtmlLayout::Rows
            } else {
                config.feed.layout
            };
            let mut writer = HtmlWriter::with_layout(&mut out, layout);
            run(&input, policy, &mut writer).map_err(failed)?;
        }
        "mail" => {
            let mut writer = MailWriter::new(&mut out);
            run(&input, policy, &mut writer).map_err(failed)?;
        }
        "rss" => {
            let mut writer = RssWriter::new(&mut out);
            writer
                .begin_channel(&request.title, &config.links.site_top, &request.title)
                .map_err(failed)?;
            run(&input, policy, &mut writer).map_err(failed)?;
            writer.end_channel().map_err(failed)?;
        }
        "json" => {
            let mut writer = JsonLinesWriter::new(&mut out);
            run(&input, policy, &mut writer).map_err(failed)?;
        }
        "index" => {
            let mut counts = KeyCounts::new(config.feed.order, Collect::new());
            run(&input, Box::new(Everything), &mut counts).map_err(failed)?;
            for (key, count) in counts.counts() {
                out.extend_from_slice(format!("{key}\t{count}\n").as_bytes());
            }
        }
        other => {
            return Err(format!(
                "Target '{other}' not supported; available targets: {}",
                FEED_TARGETS.join(", ")
            ))
        }
    }
    Ok(out)
}
