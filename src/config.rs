use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "docling-gateway")]
#[command(about = "HTTP gateway in front of a document conversion backend")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Conversion backends (comma-separated)
    // Example: "localhost:5001,localhost:5002"
    #[arg(short, long, default_value = "localhost:5001")]
    pub backends: String,

    // API key clients must present in the X-API-Key header
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    // Max requests allowed per client per window
    #[arg(long, default_value_t = 100)]
    pub rate_limit: usize,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 3600)]
    pub rate_window: u64,

    // Backend health check interval in seconds
    #[arg(long, default_value_t = 30)]
    pub health_interval: u64,

    // Idle rate limiter entries are swept on this interval in seconds
    #[arg(long, default_value_t = 300)]
    pub sweep_interval: u64,
}
