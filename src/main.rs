use koii_session::config::{load_config, print_schema};
use koii_session::startup;
use koii_session::utils::init_logging;

// -- Entrypoint

#[tokio::main]
async fn main() {
    // `--schema` prints the config JSON schema and exits.
    if std::env::args().any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = load_config();
    init_logging(&config.logging);

    if let Err(e) = startup::run(config).await {
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }
}
