use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use search_core::config::load_config;
use search_core::loader::{ingest, load_documents};
use search_core::paginator::paginate;
use search_core::request_queue::RequestQueue;
use search_core::{DocumentStatus, EngineConfig, SearchServer};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Load documents into an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    /// Input path (JSON / JSONL file or directory)
    #[arg(long)]
    input: String,
    /// JSON engine config file
    #[arg(long)]
    config: Option<String>,
    /// Whitespace separated stop words, overrides the config file
    #[arg(long)]
    stop_words: Option<String>,
    /// Maximum ranked results per query, overrides the config file
    #[arg(long)]
    max_results: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more queries and print ranked results page by page
    Search {
        #[command(flatten)]
        engine: EngineArgs,
        /// Query text; repeat for several queries
        #[arg(long, short, required = true)]
        query: Vec<String>,
        /// Only documents with this status (ACTUAL, IRRELEVANT, BANNED, REMOVED)
        #[arg(long, default_value = "ACTUAL")]
        status: DocumentStatus,
        /// Remove duplicate documents before searching
        #[arg(long, default_value_t = false)]
        dedupe: bool,
        #[arg(long, default_value_t = 2)]
        page_size: usize,
    },
    /// Explain which query terms occur in a document
    Match {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(long, short)]
        query: String,
        #[arg(long)]
        id: u32,
    },
    /// Remove duplicate documents and print the surviving ids
    Dedupe {
        #[command(flatten)]
        engine: EngineArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { engine, query, status, dedupe, page_size } => {
            let mut server = build_server(&engine)?;
            if dedupe {
                server.remove_duplicates();
            }
            run_queries(&server, &query, status, page_size)
        }
        Commands::Match { engine, query, id } => {
            let server = build_server(&engine)?;
            let (terms, status) = server.match_document(&query, id)?;
            println!("{}", serde_json::json!({ "id": id, "status": status, "terms": terms }));
            Ok(())
        }
        Commands::Dedupe { engine } => {
            let mut server = build_server(&engine)?;
            for id in server.remove_duplicates() {
                println!("Found duplicate document id {id}");
            }
            for id in &server {
                println!("{id}");
            }
            Ok(())
        }
    }
}

fn engine_config(args: &EngineArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(words) = &args.stop_words {
        config.stop_words = words.split_whitespace().map(str::to_string).collect();
    }
    if let Some(max) = args.max_results {
        config.max_results = max;
    }
    Ok(config)
}

fn build_server(args: &EngineArgs) -> Result<SearchServer> {
    let config = engine_config(args)?;
    let mut server = SearchServer::new(config)?;
    let docs = load_documents(&args.input)?;
    ingest(&mut server, &docs)?;
    Ok(server)
}

fn run_queries(server: &SearchServer, queries: &[String], status: DocumentStatus, page_size: usize) -> Result<()> {
    let mut requests = RequestQueue::new();
    for query in queries {
        let docs = requests.add_find_request_with_status(server, query, status)?;
        println!("query: {query}");
        for page in &paginate(&docs, page_size) {
            println!("{page}");
            println!("Page break");
        }
    }
    tracing::info!(
        requests = queries.len(),
        no_results = requests.no_result_requests(),
        "queries complete"
    );
    Ok(())
}
