//! # Gallery Client SDK
//!
//! A client for the gallery gateway's four JSON/HTTP endpoints.
//!
//! ## Features
//!
//! - **Gateway calls**: list, upload, download and delete through [`GalleryClient`]
//! - **Presentation**: search, extension filter and ordering through [`GalleryView`]
//! - **Sessions**: [`Gallery`] re-fetches the listing after every mutation
//!
//! ## Example
//!
//! ```rust,ignore
//! use gallery_client::{Gallery, GalleryClient, SortOrder, UploadRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GalleryClient::with_endpoint("http://localhost:3000")?;
//!     let mut gallery = Gallery::new(client);
//!
//!     // Upload a file, the listing is refreshed afterwards
//!     gallery.upload(UploadRequest::from_path("cat.png").await?).await?;
//!
//!     // Show PNGs, A to Z
//!     gallery.view_mut().set_extension(Some("png".into()));
//!     gallery.view_mut().set_sort(SortOrder::NameAsc);
//!     for key in gallery.view().visible() {
//!         println!("{}", key);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod gallery;
mod types;
pub mod view;

pub use client::GalleryClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use gallery::Gallery;
pub use types::*;
pub use view::GalleryView;
