use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "finyap", version, about = "Finnish sentence memorisation drill")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session over the selected scenarios
    Play(commands::play::PlayArgs),
    /// List scenarios with their play statistics
    Scenarios {
        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Print the vocabulary pool, one word per line
    Vocab {
        /// Limit to these scenarios
        #[arg(short, long = "scenario")]
        scenarios: Vec<String>,
    },
    /// Show recent results for a sentence
    History {
        sentence_id: i64,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Scenarios { filter } => commands::scenarios::run(filter.as_deref()),
        Commands::Vocab { scenarios } => commands::vocab::run(&scenarios),
        Commands::History { sentence_id, limit } => commands::history::run(sentence_id, limit),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
