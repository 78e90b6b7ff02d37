//! HTTP server layer for the image service.
//!
//! This module provides the HTTP API for serving assets and resized variants.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │      GET /images/{*path}      GET /health      GET /            │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │           routes            │  │
//! │  │ (requests, error bodies) │  │  (router config, CORS)      │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, image_handler, root_handler, AppState, ErrorResponse, HealthResponse,
    RootResponse,
};
pub use routes::{create_default_router, create_router, RouterConfig};
