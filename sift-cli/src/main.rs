//! sift CLI
//!
//! Parse a document from a file, a URL or a literal string and run selector
//! queries against it.

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use sift_document::{Document, MatchOptions, NodeId, NodeSummary, ParseOptions};
use tracing_subscriber::EnvFilter;

/// sift: query HTML documents with CSS selectors
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the parsed tree
    sift ./index.html

    # Every link on a page
    sift https://example.com -s 'a[href]'

    # Text of the last list item
    sift page.html -s 'ul li' --index -1 --text

    # Summaries as JSON
    sift --html '<p id=a>hi</p>' -s '#a' --json
"#)]
struct Cli {
    /// Path to an HTML file or an http(s) URL
    #[arg(value_name = "FILE|URL")]
    path: Option<String>,

    /// Parse this HTML string instead of a file or URL
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Selector to run; may be repeated
    #[arg(short = 's', long = "select", value_name = "SELECTOR")]
    selectors: Vec<String>,

    /// Keep only the N-th match of each selector; negative counts from the end
    #[arg(short = 'n', long, value_name = "N", allow_negative_numbers = true)]
    index: Option<isize>,

    /// Compare attribute values ignoring case
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Print the plain text of each match
    #[arg(long, conflicts_with_all = ["inner", "json"])]
    text: bool,

    /// Print the inner markup of each match
    #[arg(long, conflicts_with = "json")]
    inner: bool,

    /// Print node summaries as JSON
    #[arg(long)]
    json: bool,

    /// Print the tree outline even when selectors are given
    #[arg(long)]
    tree: bool,

    /// Keep tag and attribute names as written
    #[arg(long)]
    no_lowercase: bool,

    /// Keep \r and \n in the input
    #[arg(long)]
    keep_newlines: bool,

    /// Only close elements at explicit end tags
    #[arg(long)]
    trust_markup: bool,

    /// Log parser and matcher activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// How each match is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Outer,
    Inner,
    Text,
    Json,
}

impl Cli {
    const fn output(&self) -> Output {
        if self.json {
            Output::Json
        } else if self.text {
            Output::Text
        } else if self.inner {
            Output::Inner
        } else {
            Output::Outer
        }
    }

    fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::default();
        if self.no_lowercase {
            options = options.with_case_preserved();
        }
        if self.keep_newlines {
            options = options.with_line_breaks_kept();
        }
        if self.trust_markup {
            options = options.with_markup_trusted();
        }
        options
    }

    const fn match_options(&self) -> MatchOptions {
        if self.ignore_case {
            MatchOptions::ignoring_case()
        } else {
            MatchOptions {
                case_insensitive_values: false,
            }
        }
    }
}

/// JSON record for one selector.
#[derive(Serialize)]
struct QueryResult<'a> {
    selector: &'a str,
    matches: Vec<NodeSummary>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let doc = load_doc(&cli)?;
    tracing::debug!(?doc, "loaded document");

    if cli.selectors.is_empty() && cli.output() == Output::Json {
        return print_all_json(&doc);
    }
    if cli.selectors.is_empty() || cli.tree {
        print_document(&doc);
    }
    if cli.selectors.is_empty() {
        return Ok(());
    }

    let results: Vec<(&str, Vec<NodeId>)> = cli
        .selectors
        .iter()
        .map(|selector| (selector.as_str(), run_query(&doc, &cli, selector)))
        .collect();

    match cli.output() {
        Output::Json => print_json(&doc, &results)?,
        output => {
            for (selector, ids) in &results {
                print_matches(&doc, selector, ids, output);
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load document from CLI arguments
fn load_doc(cli: &Cli) -> Result<Document> {
    let options = cli.parse_options();
    if let Some(ref html) = cli.html {
        Ok(Document::parse_with(html, options))
    } else if let Some(ref path) = cli.path {
        Document::load(path, options).with_context(|| format!("could not load {path}"))
    } else {
        bail!("expected a file path, a URL, or --html")
    }
}

fn run_query(doc: &Document, cli: &Cli, selector: &str) -> Vec<NodeId> {
    let options = cli.match_options();
    match cli.index {
        Some(index) => doc
            .find_nth_with(selector, index, options)
            .into_iter()
            .collect(),
        None => doc.find_with(selector, options),
    }
}

/// Print the outline and parse details.
fn print_document(doc: &Document) {
    println!("{}", "=== DOM Tree ===".bold());
    print!("{}", doc.dump());

    println!("\n{}", "=== Document ===".bold());
    println!("charset: {}", doc.charset());
    println!("nodes:   {}", doc.tree().len());
    println!("size:    {} bytes ({} as given)", doc.size(), doc.original_size());

    if !doc.issues().is_empty() {
        println!("\n{}", "=== Parse Issues ===".bold());
        for issue in doc.issues() {
            println!("  - {} at byte {}", issue.kind.yellow(), issue.offset);
        }
    }
    println!();
}

fn print_matches(doc: &Document, selector: &str, ids: &[NodeId], output: Output) {
    let count = match ids.len() {
        1 => "1 match".to_string(),
        n => format!("{n} matches"),
    };
    println!("{} {}", selector.bold().cyan(), format!("({count})").dimmed());
    for &id in ids {
        let rendered = match output {
            Output::Inner => doc.inner_text(id),
            Output::Text => doc.plain_text(id),
            Output::Outer | Output::Json => doc.outer_text(id),
        };
        println!("{rendered}");
    }
}

fn print_json(doc: &Document, results: &[(&str, Vec<NodeId>)]) -> Result<()> {
    let records: Vec<QueryResult<'_>> = results
        .iter()
        .map(|(selector, ids)| QueryResult {
            selector: *selector,
            matches: ids
                .iter()
                .filter_map(|&id| doc.node(id).and_then(|node| node.summary()))
                .collect(),
        })
        .collect();
    let json = serde_json::to_string_pretty(&records).context("could not encode results")?;
    println!("{json}");
    Ok(())
}

/// Summaries of every node, in document order.
fn print_all_json(doc: &Document) -> Result<()> {
    let summaries: Vec<NodeSummary> = doc
        .tree()
        .iter()
        .filter_map(|(id, _)| NodeSummary::of(doc.tree(), id))
        .collect();
    let json = serde_json::to_string_pretty(&summaries).context("could not encode tree")?;
    println!("{json}");
    Ok(())
}
