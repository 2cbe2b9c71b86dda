use clap::Parser;
use leadblocks_api::cli::utils::output_error;
use leadblocks_api::cli::{Cli, OutputFormat};
use leadblocks_api::client::ClientError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    leadblocks_api::init_tracing("warn");

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = leadblocks_api::cli::run(cli).await {
        let status = e.downcast_ref::<ClientError>().and_then(ClientError::status);
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => output_error(&output_format, &e.to_string(), status)?,
        }
        std::process::exit(1);
    }

    Ok(())
}
