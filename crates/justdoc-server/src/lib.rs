//! HTTP API for JustDoc.
//!
//! Thin transport over [`justdoc_store::DocumentStore`]: validates names and
//! JSON bodies, limits body size, and maps store results to status codes.
//!
//! | route | store call |
//! |---|---|
//! | `GET /` | `list_channels` |
//! | `GET /{channel}/` | `list_documents` |
//! | `GET /{channel}/{document}` | `get_document` |
//! | `POST /{channel}/{document}` | `put_document` |

pub mod config;
pub mod error;
pub mod handler;
pub mod names;
pub mod openapi;
pub mod router;
pub mod server;

pub use config::{ServerConfig, DEFAULT_MAX_BODY_SIZE};
pub use error::{ErrorBody, ServerError, ServerResult};
pub use handler::{AppState, WriteResponse, WriteStatus};
pub use server::JustDocServer;
