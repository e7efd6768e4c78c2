use guest_sync::{App, Config};
use tracing::error;

#[tokio::main]
async fn main() {
    guest_sync::telemetry::init(env!("CARGO_PKG_NAME"), std::io::stdout);

    let result = match Config::from_env() {
        Ok(config) => match App::new(config) {
            Ok(app) => app.run().await,
            Err(error) => Err(error),
        },
        Err(error) => Err(error.into()),
    };

    if let Err(error) = result {
        error!(error = ?error, "exiting");
        std::process::exit(1);
    }
}
