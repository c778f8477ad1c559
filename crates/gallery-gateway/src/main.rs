//! Gallery Gateway - HTTP front for an S3-compatible image bucket

use clap::Parser;
use gallery_gateway::{run_server_with_shutdown, server::ctrl_c_signal, GatewayConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "gallery-gateway")]
#[command(about = "HTTP gateway for listing, uploading, downloading and deleting gallery images")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "GALLERY_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "GALLERY_PORT")]
    port: u16,

    /// S3-compatible endpoint URL (e.g., http://localhost:9000 for MinIO)
    #[arg(long, env = "S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// S3 region
    #[arg(long, default_value = "us-east-1", env = "S3_REGION")]
    s3_region: String,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    s3_access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY", hide_env_values = true)]
    s3_secret_key: Option<String>,

    /// Bucket holding the gallery
    #[arg(long, env = "S3_BUCKET_NAME", required_unless_present = "memory_store")]
    s3_bucket: Option<String>,

    /// Use path-style addressing
    #[arg(long, default_value_t = true, env = "S3_FORCE_PATH_STYLE", action = clap::ArgAction::Set)]
    s3_force_path_style: bool,

    /// Use in-memory storage (for testing, data will not persist)
    #[arg(long, env = "GALLERY_MEMORY_STORE")]
    memory_store: bool,

    /// Maximum upload request size in bytes
    #[arg(long, default_value_t = 50 * 1024 * 1024, env = "GALLERY_MAX_UPLOAD_SIZE")]
    max_upload_size: usize,

    /// Enable permissive CORS
    #[arg(long, default_value_t = true, env = "GALLERY_CORS", action = clap::ArgAction::Set)]
    cors: bool,

    /// Enable debug logging
    #[arg(short, long, env = "GALLERY_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "gallery_gateway={level},gallery_store={level},tower_http=info",
                    level = log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting gallery gateway on {}:{}", args.host, args.port);

    if args.memory_store {
        tracing::warn!("⚠️  Using in-memory storage - data will NOT persist!");
    }

    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        s3_endpoint: args.s3_endpoint,
        s3_region: args.s3_region,
        s3_access_key: args.s3_access_key,
        s3_secret_key: args.s3_secret_key,
        s3_bucket: args.s3_bucket.unwrap_or_else(|| "gallery".to_string()),
        s3_force_path_style: args.s3_force_path_style,
        use_memory_store: args.memory_store,
        max_upload_size: args.max_upload_size,
        cors_enabled: args.cors,
    };

    run_server_with_shutdown(config, ctrl_c_signal()).await
}
