use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "ipl_ingest=info";

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default
/// filter. Calling this more than once is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
