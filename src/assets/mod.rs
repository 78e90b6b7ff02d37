//! Original asset access: request path parsing and root-contained reads.
//!
//! This module owns the boundary between request paths and the filesystem.
//! [`parse_request_path`] classifies a path as a plain asset reference or a
//! resize request encoded in the filename, and [`AssetStore`] resolves
//! relative paths under the assets root with traversal containment.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               Image Service              │
//! └───────────┬─────────────────┬────────────┘
//!             │                 │
//!             ▼                 ▼
//! ┌───────────────────┐  ┌───────────────────┐
//! │ parse_request_path│  │    AssetStore     │
//! │ (resize protocol) │  │ (contained reads) │
//! └───────────────────┘  └───────────────────┘
//! ```

mod path;
mod store;

pub use path::{parse_request_path, AssetRequest, ResizeRequest};
pub use store::AssetStore;
