//! Image CDN - An asset server with on-the-fly resizing.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_cdn::{
    assets::AssetStore,
    cache::DiskCache,
    config::Config,
    resize::{ImageService, ServiceOptions},
    server::{create_router, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    run(config).await
}

// =============================================================================
// Server Startup
// =============================================================================

async fn run(config: Config) -> ExitCode {
    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    // Print startup banner and info
    print_banner();

    info!("Configuration:");
    info!("  Assets dir: {}", config.assets_dir);
    info!("  Cache dir: {}", config.cache_dir);
    if let Some(ref base_url) = config.base_url {
        info!("  Base URL: {}", base_url);
    }
    info!(
        "  Max dimensions: {}x{}",
        config.max_width, config.max_height
    );
    info!("  JPEG quality: {}", config.default_quality);
    info!("  Cache bound: {} files", config.max_cache_files);

    // A missing assets directory is not fatal; it may be mounted after
    // startup. Requests 404 until it appears.
    if !Path::new(&config.assets_dir).is_dir() {
        warn!("  Assets directory does not exist: {}", config.assets_dir);
        warn!("        Requests will return 404 until it appears");
    }

    // Create the cache directory up front
    if let Err(e) = std::fs::create_dir_all(&config.cache_dir) {
        error!(
            "Failed to create cache directory {}: {}",
            config.cache_dir, e
        );
        return ExitCode::FAILURE;
    }

    // Create the image service
    let service = ImageService::with_options(
        AssetStore::new(&config.assets_dir),
        DiskCache::new(&config.cache_dir),
        ServiceOptions {
            max_width: config.max_width,
            max_height: config.max_height,
            max_cache_files: config.max_cache_files,
        },
    );

    // Build router configuration
    let router_config = build_router_config(&config);

    // Create router
    let router = create_router(service, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/images/<name>.jpg", addr);
    info!("    curl http://{}/images/<name>-300-200.jpg", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Print the startup banner.
fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    info!("");
    info!("██╗███╗   ███╗ █████╗  ██████╗ ███████╗     ██████╗██████╗ ███╗   ██╗");
    info!("██║████╗ ████║██╔══██╗██╔════╝ ██╔════╝    ██╔════╝██╔══██╗████╗  ██║");
    info!("██║██╔████╔██║███████║██║  ███╗█████╗      ██║     ██║  ██║██╔██╗ ██║");
    info!("██║██║╚██╔╝██║██╔══██║██║   ██║██╔══╝      ██║     ██║  ██║██║╚██╗██║");
    info!("██║██║ ╚═╝ ██║██║  ██║╚██████╔╝███████╗    ╚██████╗██████╔╝██║ ╚████║");
    info!("╚═╝╚═╝     ╚═╝╚═╝  ╚═╝ ╚═════╝ ╚══════╝     ╚═════╝╚═════╝ ╚═╝  ╚═══╝");
    info!("");
    info!("  v{}", version);
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_cdn=debug,tower_http=debug"
    } else {
        "image_cdn=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_default_quality(config.default_quality)
        .with_cache_dir(config.cache_dir.clone());

    // Apply CORS origins
    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    // Apply tracing setting
    router_config = router_config.with_tracing(!config.no_tracing);

    router_config
}
