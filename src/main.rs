use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use harfzaar_api::{AppState, RestApi, ServerConfig};
use harfzaar_core::{NearestNeighbors, PoemStore, WordStore};
use harfzaar_similarity::{
    build_poem_index, Embedder, HashEmbedder, PoemSearch, RemoteEmbedder, RhymeSearch,
    DEFAULT_EMBEDDING_DIM,
};
use harfzaar_storage::{import_poems, import_words, save_index, StorageManager, INDEX_FILENAME};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Semantic poem search and qaafia suggestions
#[derive(Parser, Debug)]
#[command(name = "harfzaar")]
#[command(about = "Semantic poem search and qaafia suggestions", long_about = None)]
struct Cli {
    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Load exported poems and qaafia words into the data directory
    Import(ImportArgs),
    /// Embed stored poems and write the poem index artifact
    Index(IndexArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum EmbedderKind {
    Hash,
    Remote,
}

#[derive(Args, Debug)]
struct EmbedderArgs {
    #[arg(long, value_enum, default_value_t = EmbedderKind::Hash)]
    embedder: EmbedderKind,

    /// Base URL of the embedding service (required with `--embedder remote`)
    #[arg(long)]
    embedder_url: Option<String>,

    #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIM)]
    embedding_dim: usize,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    http_port: u16,

    #[command(flatten)]
    embedder: EmbedderArgs,

    /// Per-request budget for embedding and store work
    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,
}

#[derive(Args, Debug)]
struct ImportArgs {
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Poem documents (JSON array or one document per line)
    #[arg(long)]
    poems: Option<PathBuf>,

    /// Qaafia word documents (JSON array or one document per line)
    #[arg(long)]
    words: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct IndexArgs {
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    #[command(flatten)]
    embedder: EmbedderArgs,

    /// Timeout for each call to a remote embedder
    #[arg(long, default_value_t = 30)]
    embed_timeout_secs: u64,

    /// Also embed qaafia words stored without an embedding
    #[arg(long)]
    embed_words: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Command::Serve(args) => serve(args),
        Command::Import(args) => import(args),
        Command::Index(args) => index(args),
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level {:?}", level))?;

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_embedder(args: &EmbedderArgs, timeout: Duration) -> anyhow::Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match args.embedder {
        EmbedderKind::Hash => Arc::new(HashEmbedder::new(args.embedding_dim)),
        EmbedderKind::Remote => {
            let Some(url) = args.embedder_url.as_deref() else {
                bail!("--embedder-url is required with --embedder remote");
            };
            Arc::new(RemoteEmbedder::new(url, args.embedding_dim, timeout)?)
        }
    };
    info!(
        "Embedder: {} (dimension {})",
        embedder.model_name(),
        embedder.dimension()
    );
    Ok(embedder)
}

fn serve(args: ServeArgs) -> anyhow::Result<()> {
    info!("Starting Harfzaar v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    let embedder = build_embedder(
        &args.embedder,
        Duration::from_secs(args.request_timeout_secs),
    )?;
    let storage = StorageManager::open(&args.data_dir, embedder.dimension())?;
    let store = storage.store();
    info!(
        "Storage initialized: {} poems, {} qaafia words, {} indexed vectors",
        store.poem_count()?,
        store.word_count()?,
        storage.index().len()
    );

    let poems = PoemSearch::new(embedder.clone(), storage.index(), store.clone());
    let rhymes = RhymeSearch::new(embedder, store);
    let state = Arc::new(
        AppState::new(poems, rhymes)
            .with_request_timeout(Duration::from_secs(args.request_timeout_secs)),
    );

    let config = ServerConfig {
        host: args.host,
        port: args.http_port,
    };
    info!("Starting HTTP server on {}:{}", config.host, config.port);

    actix_web::rt::System::new()
        .block_on(RestApi::start(state, config))
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

fn import(args: ImportArgs) -> anyhow::Result<()> {
    if args.poems.is_none() && args.words.is_none() {
        bail!("nothing to import: pass --poems and/or --words");
    }

    let store = StorageManager::open_store(&args.data_dir)?;

    if let Some(path) = &args.poems {
        import_poems(&store, path)?;
    }
    if let Some(path) = &args.words {
        import_words(&store, path)?;
    }

    info!(
        "Store now holds {} poems and {} qaafia words",
        store.poem_count()?,
        store.word_count()?
    );
    Ok(())
}

fn index(args: IndexArgs) -> anyhow::Result<()> {
    let embedder = build_embedder(
        &args.embedder,
        Duration::from_secs(args.embed_timeout_secs),
    )?;
    let store = StorageManager::open_store(&args.data_dir)?;

    if args.embed_words {
        let filled = store.fill_word_embeddings(|word| embedder.embed(word))?;
        info!("Embedded {} qaafia words", filled);
    }

    let index = build_poem_index(embedder.as_ref(), &store)?;
    let path = args.data_dir.join(INDEX_FILENAME);
    save_index(&path, &index)?;
    info!("Indexed {} poems into {:?}", index.len(), path);
    Ok(())
}
