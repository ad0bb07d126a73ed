//! Route `tracing` output to the browser console.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_web::MakeWebConsoleWriter;

const FALLBACK_FILTER: &str = "info";

/// Install the console subscriber. Later calls are no-ops.
pub fn init(directives: &str) {
    // The default timer reads `SystemTime`, which wasm32 does not have
    let console = fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    let _ = tracing_subscriber::registry()
        .with(filter(directives))
        .with(console)
        .try_init();
}

/// Filter from the page's directives, `info` when they do not parse.
fn filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_directives_are_used() {
        assert_eq!(filter("nyamedia_core=debug").to_string(), "nyamedia_core=debug");
    }

    #[test]
    fn unparsable_directives_fall_back_to_info() {
        assert_eq!(filter("nyamedia_core=loud").to_string(), FALLBACK_FILTER);
    }
}
