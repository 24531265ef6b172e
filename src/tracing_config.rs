//! Tracing configuration for debugging pass behavior.
//!
//! Output format is controlled by `VELD_LOG_FORMAT`:
//!
//! - `text` (default): standard flat `tracing-subscriber` output
//! - `tree`: hierarchical indented output via `tracing-tree`
//! - `json`: one JSON object per span/event
//!
//! The filter comes from `VELD_LOG` (falling back to `RUST_LOG`), using the
//! usual syntax, e.g. `VELD_LOG=veld_noarg=debug`. The subscriber is only
//! installed when one of the two variables is set, so unconfigured runs pay
//! nothing. All output goes to stderr.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Tree,
    Json,
}

fn format_from_env() -> LogFormat {
    match std::env::var("VELD_LOG_FORMAT")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "tree" => LogFormat::Tree,
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

/// `VELD_LOG` takes precedence over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("VELD_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber. Does nothing when neither
/// `VELD_LOG` nor `RUST_LOG` is set.
pub fn init_tracing() {
    if std::env::var("VELD_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    match format_from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
