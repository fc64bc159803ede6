use clap::Parser;
use joke_client::core::ConfigProvider;
use joke_client::utils::{logger, validation::Validate};
use joke_client::{CliConfig, FetchMode, Joke, JokeClient, JokeProvider, RequestContext};

fn print_jokes(jokes: &[Joke]) {
    for (count, joke) in jokes.iter().enumerate() {
        println!("{}. {}", count + 1, joke);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            std::process::exit(1);
        }
    };

    let client = match JokeClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(
                "Failed to create joke client: {} (Category: {:?})",
                e,
                e.category()
            );
            std::process::exit(1);
        }
    };
    let provider: &dyn JokeProvider = &client;
    let ctx = RequestContext::with_timeout(config.timeout());

    tracing::info!("Fetching jokes from {}", config.base_url());
    let result = match cli.mode {
        FetchMode::Random => provider.fetch_random_joke(&ctx).await.map(|joke| vec![joke]),
        FetchMode::Ten => provider.fetch_ten_jokes(&ctx).await,
    };

    match result {
        Ok(jokes) => print_jokes(&jokes),
        Err(e) => {
            tracing::error!(
                "Critical error fetching joke: {} (Category: {:?})",
                e,
                e.category()
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
