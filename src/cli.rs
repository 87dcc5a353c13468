use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kelp-kv")]
#[command(about = "An in-memory key/value server speaking RESP")]
#[command(long_about = "Kelp is an in-memory key/value server with string, list, set and hash values, \
compatible with Redis clients over the RESP2 wire protocol")]
#[command(version)]
pub struct Cli {
    /// Server host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Server port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Maximum number of concurrent client connections
    #[arg(long)]
    pub max_connections: Option<usize>,

    /// Configuration file path (JSON format)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable OpenTelemetry metrics
    #[arg(long)]
    pub no_metrics: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Print usage examples and exit
    #[arg(long)]
    pub examples: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Print example invocations
    pub fn print_examples() {
        println!("Examples:");
        println!("  # Start on the default address (127.0.0.1:6379)");
        println!("  {}", env!("CARGO_PKG_NAME"));
        println!();

        println!("  # Custom host and port");
        println!("  {} --host 0.0.0.0 --port 6380", env!("CARGO_PKG_NAME"));
        println!();

        println!("  # Limit concurrent clients");
        println!("  {} --max-connections 128", env!("CARGO_PKG_NAME"));
        println!();

        println!("  # Load from config file");
        println!("  {} --config config.json", env!("CARGO_PKG_NAME"));
        println!();

        println!("  # Debug logging, metrics off");
        println!("  {} --debug --no-metrics", env!("CARGO_PKG_NAME"));
    }
}
