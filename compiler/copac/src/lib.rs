//! Generation pass driver.
//!
//! A pass walks every copy directive of a [`SymbolGraphProvider`] snapshot
//! through the same states:
//!
//! ```text
//! Collected ─► GraphBuilt ─► Ordered ─► PerDirective { resolve ► extract ► rewrite ► emit } ─► Done
//! ```
//!
//! Resolution and per-directive generation run in parallel when
//! [`GeneratorConfig::parallel`] is set; the dependency graph is the barrier
//! between the two. Errors are local to their directive. The output order
//! and diagnostic order depend only on the input.
//!
//! [`SymbolGraphProvider`]: copa_ir::SymbolGraphProvider

mod cancel;
mod config;
mod emit;
mod error;
mod pass;
mod unit;
mod validate;

use std::sync::Once;

pub use cancel::CancellationToken;
pub use config::GeneratorConfig;
pub use error::PassError;
pub use pass::{generate, Generator};
pub use unit::{GenerationUnit, PassOutput};

static TRACING_INIT: Once = Once::new();

/// Install a `RUST_LOG`-driven subscriber, once per process.
///
/// Does nothing when `RUST_LOG` is unset. Hosts call this; the pass never
/// installs a subscriber on its own.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
