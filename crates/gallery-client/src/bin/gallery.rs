//! Gallery CLI - browse and manage a gallery through its gateway

use anyhow::Context;
use clap::{Parser, Subcommand};
use gallery_client::{view::is_image, Config, Gallery, GalleryClient, SortOrder, UploadRequest};
use std::{path::PathBuf, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "gallery")]
#[command(about = "List, upload, download and delete gallery images")]
#[command(version)]
struct Cli {
    /// Gateway base URL
    #[arg(long, default_value = "http://localhost:3000", env = "GALLERY_ENDPOINT", global = true)]
    endpoint: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60, env = "GALLERY_TIMEOUT", global = true)]
    timeout: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the gallery listing
    List {
        /// Case-insensitive substring filter
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only keys with this extension
        #[arg(short, long)]
        ext: Option<String>,

        /// Display order
        #[arg(long, value_enum, default_value_t = SortOrder::Original)]
        sort: SortOrder,
    },
    /// Upload a file
    Upload {
        /// File to upload
        path: PathBuf,

        /// Store under this name instead of the filename
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Download an object
    Download {
        /// Key to download
        key: String,

        /// Where to write the file (defaults to the attachment filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete an object
    Delete {
        /// Key to delete
        key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so listings stay pipeable
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gallery_client={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::new(cli.endpoint).with_timeout(Duration::from_secs(cli.timeout));
    let mut gallery = Gallery::new(GalleryClient::new(config)?);

    match cli.command {
        Commands::List { search, ext, sort } => {
            gallery.refresh().await.context("Failed to list images")?;
            let view = gallery.view_mut();
            view.set_search(search);
            view.set_extension(ext);
            view.set_sort(sort);
            print_listing(&gallery);
        }
        Commands::Upload { path, name } => {
            let upload = UploadRequest::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            gallery.select_file(upload);
            if let Some(name) = name {
                gallery.set_custom_name(name);
            }
            let result = gallery.submit_upload().await.context("Upload failed")?;
            println!(
                "{} ({})",
                result.message,
                result.key.as_deref().unwrap_or("unnamed")
            );
            print_listing(&gallery);
        }
        Commands::Download { key, output } => {
            let image = gallery
                .client()
                .download_image(&key)
                .await
                .context("Download failed")?;
            let output = output.unwrap_or_else(|| PathBuf::from(image.save_name()));
            tokio::fs::write(&output, &image.data)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Saved {} ({} bytes) to {}", key, image.data.len(), output.display());
        }
        Commands::Delete { key } => {
            gallery.delete(&key).await.context("Delete failed")?;
            println!("Delete success ({})", key);
            print_listing(&gallery);
        }
    }

    Ok(())
}

fn print_listing(gallery: &Gallery) {
    let visible = gallery.view().visible();
    if visible.is_empty() {
        eprintln!("No images");
        return;
    }
    for key in visible {
        let marker = if is_image(&key) { "img" } else { "   " };
        println!("{}  {}", marker, key);
    }
}
