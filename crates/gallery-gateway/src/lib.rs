//! # Gallery Gateway
//!
//! HTTP gateway between the gallery UI and an S3-compatible object store.
//!
//! This crate provides:
//! - **List**: `GET /api/gallery` returns the bucket's keys as a JSON array
//! - **Upload**: `POST /api/gallery/upload` stores one multipart file
//! - **Download**: `GET /api/gallery/download?key=` streams an object as an attachment
//! - **Delete**: `DELETE /api/gallery/delete?key=` removes an object
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   Gallery Client                    │
//! │              (browser UI, `gallery` CLI)            │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                  Gallery Gateway                    │
//! ├─────────────────────────────────────────────────────┤
//! │      Request ID │ Access Log │ CORS │ Body Limit    │
//! ├─────────────────────────────────────────────────────┤
//! │   List │ Upload │ Download │ Delete  (one store     │
//! │                                       call each)    │
//! ├─────────────────────────────────────────────────────┤
//! │                   gallery-store                     │
//! │            (S3-compatible or in-memory)             │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod routes;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::{ApiError, GalleryOperation};
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
