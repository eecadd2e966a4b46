use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use spdlog::{info, warn};

use contentdex::config::LogLevel;
use contentdex::logger::configure_logger;
use contentdex::query_string::ListingQuery;
use contentdex::{ContentKind, Library};

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "contentdex.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Log resolution steps to the console
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists documents, newest first
    List {
        #[arg(short, long, default_value_t = Kind::Post)]
        kind: Kind,
        /// Only this category (`all` for every category)
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Case-insensitive match on title or description
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Lists categories
    Categories {
        #[arg(short, long, default_value_t = Kind::Post)]
        kind: Kind,
        /// Include the number of documents per category
        #[arg(long)]
        counts: bool,
    },
    /// Shows the document at `category/identifier`
    Show {
        full_path: String,
        #[arg(short, long, default_value_t = Kind::Post)]
        kind: Kind,
    },
    /// Finds a document by slug, file name or title
    Find {
        category: String,
        key: String,
        #[arg(short, long, default_value_t = Kind::Snippet)]
        kind: Kind,
    },
    /// Prints the heading outline of a document
    Toc {
        full_path: String,
        #[arg(short, long, default_value_t = Kind::Post)]
        kind: Kind,
    },
    /// Prints the slug of a text
    Slugify {
        text: String,
    },
    /// Prints every `(category, slug)` pair
    Paths {
        #[arg(short, long, default_value_t = Kind::Post)]
        kind: Kind,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Post,
    Snippet,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Post => write!(f, "post"),
            Kind::Snippet => write!(f, "snippet"),
        }
    }
}

impl From<Kind> for ContentKind {
    fn from(value: Kind) -> Self {
        match value {
            Kind::Post => ContentKind::Post,
            Kind::Snippet => ContentKind::Snippet,
        }
    }
}

#[derive(Serialize)]
struct CategoryCount {
    category: String,
    count: usize,
}

#[derive(Serialize)]
struct StaticParam<'a> {
    category: &'a str,
    slug: &'a str,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn not_found(what: &str) -> ExitCode {
    eprintln!("Not found: {}", what);
    ExitCode::from(1)
}

fn run(library: &Library, command: Command) -> Result<ExitCode> {
    match command {
        Command::List { kind, category, page, query } => {
            let query = ListingQuery::with_params(category.as_deref(), query.as_deref(), page);
            match library.listing(kind.into(), &query) {
                Ok(listing) => print_json(&listing)?,
                Err(e) if e.is_not_found() => {
                    return Ok(not_found(&format!("category {}", category.unwrap_or_default())));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Categories { kind, counts: false } => {
            print_json(&library.list_categories(kind.into()))?;
        }
        Command::Categories { kind, counts: true } => {
            let counts: Vec<CategoryCount> = library.category_counts(kind.into()).into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect();
            print_json(&counts)?;
        }
        Command::Show { full_path, kind } => {
            match library.resolve_by_full_path(kind.into(), &full_path) {
                Ok(record) => print_json(record)?,
                Err(e) if e.is_not_found() => return Ok(not_found(&full_path)),
                Err(e) => return Err(e.into()),
            }
        }
        Command::Find { category, key, kind } => {
            match library.resolve_by_slug_or_title(kind.into(), &category, &key) {
                Some(record) => print_json(&*record)?,
                None => return Ok(not_found(&format!("{}/{}", category, key))),
            }
        }
        Command::Toc { full_path, kind } => {
            match library.resolve_by_full_path(kind.into(), &full_path) {
                Ok(record) => print_json(&library.extract_headings(&record.body))?,
                Err(e) if e.is_not_found() => return Ok(not_found(&full_path)),
                Err(e) => return Err(e.into()),
            }
        }
        Command::Slugify { text } => println!("{}", library.slugify(&text)),
        Command::Paths { kind } => {
            let params: Vec<StaticParam> = library.static_params(kind.into()).into_iter()
                .map(|(category, slug)| StaticParam { category, slug })
                .collect();
            print_json(&params)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Needs neither configuration nor content
    if let Command::Slugify { ref text } = args.command {
        println!("{}", contentdex::slug::slugify(text));
        return Ok(ExitCode::SUCCESS);
    }

    let config_path = args.config_path.map(PathBuf::from);
    let (config_path, config) = match open_config(config_path) {
        Ok(found) => found,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run contentdex --help");
            return Ok(ExitCode::from(2));
        }
    };

    let fallback_level = if args.verbose { Some(LogLevel::Debug) } else { None };
    if let Err(err) = configure_logger(&config, fallback_level) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }
    info!("Configuration read from {}", config_path.display());

    let library = Library::load(&config)?;
    for kind in [ContentKind::Post, ContentKind::Snippet] {
        let index = library.index(kind);
        info!("{} {}s indexed, {} rejected", index.list_all().len(), kind, index.rejected().len());
    }

    run(&library, args.command)
}
