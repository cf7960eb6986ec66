use std::sync::Arc;

use clap::Parser;
use reimagine::config::setup_logging;
use reimagine::model::gemini::GeminiClient;
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = reimagine::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let client = GeminiClient::new(cli.api_key, cli.model, cli.api_base_url);

    if let Err(err) = reimagine::web::setup_server(
        &cli.listen_address,
        cli.port,
        Arc::new(client),
        &cli.default_instruction,
    )
    .await
    {
        error!("Application error: {}", err);
    }
}
