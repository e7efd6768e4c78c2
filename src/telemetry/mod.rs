mod run;

use std::env;

use tracing::Level;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{
    filter::Targets, fmt::MakeWriter, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

pub use self::run::{run_span, RunId};

/// Install the global subscriber, writing bunyan-formatted JSON lines to `sink`.
///
/// `RUST_LOG` replaces the default targets and is ignored when it does not
/// parse; this crate and `name` are always
/// logged at DEBUG.
pub fn init<Sink>(name: impl ToString, sink: Sink)
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let name = name.to_string();

    let filter = match env::var("RUST_LOG") {
        Ok(filter) => filter.parse().unwrap_or_else(|_| Targets::new()),
        Err(_) => Targets::new(),
    }
    .with_target(env!("CARGO_PKG_NAME").replace('-', "_"), Level::DEBUG)
    .with_target(&name, Level::DEBUG);

    tracing_subscriber::registry()
        .with(filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name, sink))
        .init();
}
