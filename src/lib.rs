pub mod config;
pub mod errors;
pub mod executor;
pub mod journal;
pub mod operation;

pub use errors::{DispatchError, DispatchResult};
pub use executor::dispatcher::Dispatcher;
pub use executor::enigo_backend::EnigoBackend;
pub use executor::launcher::SystemRunner;
pub use operation::types::{GroundedOperation, MetaOperation, NormalizedOperation};

/// Installs the global `tracing` subscriber; `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
