// Diagnostics logging and the session transcript
//
// Diagnostics go through `tracing` to stderr so they never interleave with the
// feedback printed on stdout. The transcript is a separate JSONL record of
// every exchange with the collaborator.

pub mod transcript;

pub use transcript::{TranscriptEntry, TranscriptLogger};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug output for this
/// crate when `debug` is true.
pub fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug));

    // Ignore the error if a subscriber is already installed (e.g. in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("warn,tasklark=debug")
    } else {
        EnvFilter::new("warn")
    }
}
