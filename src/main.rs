use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use tsq::locale::resolve_locale;
use tsq::translator::{catalog_candidates, resolve_catalog_path};
use tsq::{
    run_check, run_search, run_stats, Checker, MatchScope, ReferenceTreeBuilder, SearchQuery,
    SimpleFormatter, TreeFormatter, TsParser, TsWriter,
};

/// tsq - query, validate and export Qt Linguist translation catalogs
#[derive(Parser, Debug)]
#[command(name = "tsq")]
#[command(author, version, about, long_about = None)]
#[command(help_template = "{name} {version}\n{about}\n\nUSAGE:\n    {usage}\n\n{all-args}")]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate one string the way the application would at runtime
    Lookup {
        /// Catalog file
        catalog: PathBuf,
        /// Context name (e.g., "ItemsWindow")
        context: String,
        /// Source text
        source: String,
        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,
        /// Count for plural (numerus) messages
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
    },

    /// Search source and translated texts across catalogs
    Search {
        /// Text to search for
        #[arg(value_name = "SEARCH_TEXT")]
        text: String,
        /// Catalog file or directory (defaults to the current directory)
        path: Option<PathBuf>,
        /// Case-sensitive search
        #[arg(short, long)]
        case_sensitive: bool,
        /// Match whole words only
        #[arg(short, long)]
        word: bool,
        /// Treat the search text as a regular expression
        #[arg(short, long)]
        regex: bool,
        /// Only match source texts
        #[arg(long, conflicts_with = "translation_only")]
        source_only: bool,
        /// Only match translations
        #[arg(long)]
        translation_only: bool,
        /// Directory names to skip
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// grep-style output
        #[arg(long, conflicts_with = "json")]
        simple: bool,
        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Validate catalogs; exits with status 1 when errors are found
    Check {
        /// Catalog files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
        /// Only run structural checks
        #[arg(long)]
        structural: bool,
    },

    /// Completion statistics per catalog and context
    Stats {
        /// Catalog files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Re-emit a catalog as JSON or TS
    Export {
        catalog: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a catalog as a context/message tree
    Tree {
        catalog: PathBuf,
        /// Only show one context
        #[arg(long)]
        context: Option<String>,
        /// Maximum line width
        #[arg(long, default_value = "100")]
        width: usize,
    },

    /// Show which catalog file would be loaded for a locale
    Resolve {
        /// Catalog path without locale suffix (e.g., "ts/erebus")
        prefix: PathBuf,
        /// Locale (defaults to TSQ_LOCALE, then the system locale)
        #[arg(long)]
        locale: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Json,
    Ts,
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli.command) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(command: Command) -> anyhow::Result<i32> {
    match command {
        Command::Lookup {
            catalog,
            context,
            source,
            comment,
            count,
        } => {
            let catalog = TsParser::parse_file(&catalog)?;
            let numerus = catalog
                .find(&context, &source, comment.as_deref())
                .or_else(|| catalog.find(&context, &source, None))
                .is_some_and(|m| m.numerus);
            if numerus && count.is_none() {
                eprintln!("Error: '{source}' is a plural message; pass --count");
                return Ok(1);
            }
            let text = match count {
                Some(n) => catalog
                    .translate_plural(&context, &source, comment.as_deref(), n)
                    .unwrap_or_else(|| tsq::plural::substitute_count(&source, n).into_owned()),
                None => catalog
                    .translate(&context, &source, comment.as_deref())
                    .unwrap_or(source.as_str())
                    .to_string(),
            };
            println!("{text}");
            Ok(0)
        }

        Command::Search {
            text,
            path,
            case_sensitive,
            word,
            regex,
            source_only,
            translation_only,
            exclude,
            simple,
            json,
        } => {
            if text.trim().is_empty() {
                eprintln!("Error: search text cannot be empty");
                return Ok(1);
            }

            let scope = if source_only {
                MatchScope::SourceOnly
            } else if translation_only {
                MatchScope::TranslationOnly
            } else {
                MatchScope::Both
            };
            let mut query = SearchQuery::new(text.clone())
                .with_case_sensitive(case_sensitive)
                .with_word_match(word)
                .with_regex(regex)
                .with_scope(scope)
                .with_exclusions(exclude);
            if let Some(path) = path {
                query = query.with_base_dir(path);
            }

            let result = run_search(query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if simple {
                print!("{}", SimpleFormatter::new().format(&result));
            } else if result.matches.is_empty() {
                println!("No matches found for '{text}'");
            } else {
                let tree = ReferenceTreeBuilder::build(&result);
                let rendered = TreeFormatter::new().format(&tree);
                print!("{}", highlight(&rendered, &text, case_sensitive, regex));
            }
            Ok(0)
        }

        Command::Check {
            paths,
            strict,
            structural,
        } => {
            let checker = if structural {
                Checker::new().structural_only()
            } else {
                Checker::new()
            };

            let (mut errors, mut warnings) = (0, 0);
            for path in &paths {
                for report in run_check(path, &checker)? {
                    for issue in &report.issues {
                        println!("{}: {issue}", report.file.display());
                    }
                    errors += report.error_count();
                    warnings += report.warning_count();
                }
            }

            let summary = format!("{errors} error(s), {warnings} warning(s)");
            let failed = errors > 0 || (strict && warnings > 0);
            if failed {
                eprintln!("{}", summary.red());
            } else {
                eprintln!("{}", summary.green());
            }
            Ok(i32::from(failed))
        }

        Command::Stats { paths, json } => {
            let mut all = Vec::new();
            for path in &paths {
                all.extend(run_stats(path)?);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for stats in &all {
                    print!("{}", stats.render());
                }
            }
            Ok(0)
        }

        Command::Export {
            catalog,
            format,
            output,
        } => {
            let catalog = TsParser::parse_file(&catalog)?;
            match (format, output) {
                (ExportFormat::Ts, Some(path)) => TsWriter::write_file(&catalog, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                (ExportFormat::Ts, None) => print!("{}", TsWriter::to_string(&catalog)),
                (ExportFormat::Json, output) => {
                    let rendered = serde_json::to_string_pretty(&catalog)? + "\n";
                    match output {
                        Some(path) => std::fs::write(&path, rendered)
                            .with_context(|| format!("Failed to write {}", path.display()))?,
                        None => print!("{rendered}"),
                    }
                }
            }
            Ok(0)
        }

        Command::Tree {
            catalog,
            context,
            width,
        } => {
            let catalog = TsParser::parse_file(&catalog)?;
            let tree = ReferenceTreeBuilder::build_catalog(&catalog, context.as_deref());
            print!("{}", TreeFormatter::with_width(width).format(&tree));
            Ok(0)
        }

        Command::Resolve { prefix, locale } => {
            let Some(locale) = resolve_locale(locale.as_deref()) else {
                eprintln!("Error: could not determine a locale; pass --locale");
                return Ok(1);
            };
            print_resolution(&prefix, &locale)
        }
    }
}

fn print_resolution(prefix: &Path, locale: &str) -> anyhow::Result<i32> {
    println!("locale: {locale}");
    for candidate in catalog_candidates(prefix, locale) {
        let marker = if candidate.is_file() { "found" } else { "missing" };
        println!("  {marker:>7}  {}", candidate.display());
    }
    let path = resolve_catalog_path(prefix, locale)?;
    println!("loads: {}", path.display());
    Ok(0)
}

/// Bold every occurrence of the search text
fn highlight(rendered: &str, text: &str, case_sensitive: bool, is_regex: bool) -> String {
    let pattern = if is_regex {
        text.to_string()
    } else {
        regex::escape(text)
    };
    match regex::RegexBuilder::new(&pattern)
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(re) => re
            .replace_all(rendered, |caps: &regex::Captures<'_>| {
                caps[0].bold().to_string()
            })
            .into_owned(),
        Err(_) => rendered.to_string(),
    }
}
