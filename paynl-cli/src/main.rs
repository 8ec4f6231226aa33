//! Pay.nl CLI
//!
//! Command-line access to the payment facade, talking to Pay.nl directly.

use std::net::IpAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use paynl_client::PaynlClient;
use paynl_facade::{InMemoryCache, PaymentFacade};
use paynl_types::{
    ConfigError, ExchangeCallback, FacadeOptions, GatewayConfig, StartTransactionRequest,
    TransactionId,
};

#[derive(Parser)]
#[command(name = "paynl")]
#[command(author, version, about = "Pay.nl payment facade CLI", long_about = None)]
struct Cli {
    /// Pay.nl API token [env: PAY_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// Pay.nl service ID (SL-xxxx-xxxx) [env: PAY_SERVICE_ID]
    #[arg(long)]
    service_id: Option<String>,

    /// Run transactions in test mode [env: PAY_TESTMODE]
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    test_mode: Option<String>,

    /// Base URL prefixed to return and exchange paths [env: PAY_URL_PREFIX, then APP_URL]
    #[arg(long)]
    url_prefix: Option<String>,

    /// Separate base URL for the exchange endpoint [env: PAY_EXCHANGE_URL_PREFIX]
    #[arg(long)]
    exchange_url_prefix: Option<String>,

    /// Pay.nl REST API base URL [env: PAY_API_URL]
    #[arg(long)]
    api_url: Option<String>,

    /// Path of the exchange endpoint
    #[arg(long, env = "PAY_CALLBACK_PATH", default_value = "/payments/exchange")]
    callback_path: String,

    /// Seconds a started transaction stays payable
    #[arg(long, env = "PAY_EXPIRY_SECONDS", default_value = "3600")]
    expiry_seconds: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List payment methods
    Methods,
    /// Show the name of a payment method
    MethodName {
        /// Payment option ID
        id: String,
    },
    /// List iDEAL banks
    Banks,
    /// Start a transaction
    Start {
        #[arg(long, default_value = "EUR")]
        currency: String,
        /// Amount in major units (10.00 = ten euros)
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        return_path: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "NL")]
        language: String,
        /// Address reported as the paying client
        #[arg(long, default_value = "127.0.0.1")]
        ip: IpAddr,
    },
    /// Show a transaction's current data
    Status {
        /// Transaction ID
        id: String,
    },
    /// Resolve the transaction of an exchange call
    Exchange {
        #[arg(long)]
        order_id: String,
        #[arg(long, default_value = "new_ppt")]
        action: String,
    },
}

impl Cli {
    /// Builds the gateway settings the same way the server does, with
    /// command-line flags taking precedence over the environment.
    fn gateway_config<F>(&self, env: F) -> Result<GatewayConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        GatewayConfig::from_lookup(|key| self.flag(key).or_else(|| env(key)))
    }

    fn flag(&self, key: &str) -> Option<String> {
        let value = match key {
            "PAY_TOKEN" => &self.token,
            "PAY_SERVICE_ID" => &self.service_id,
            "PAY_TESTMODE" => &self.test_mode,
            "PAY_URL_PREFIX" => &self.url_prefix,
            "PAY_EXCHANGE_URL_PREFIX" => &self.exchange_url_prefix,
            "PAY_API_URL" => &self.api_url,
            _ => return None,
        };
        value.clone()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = cli.gateway_config(|key| std::env::var(key).ok())?;
    let client = PaynlClient::from_config(&config)?;
    let options = FacadeOptions::new(&cli.callback_path, cli.expiry_seconds);
    let facade = PaymentFacade::new(config, options, client, InMemoryCache::new())?;

    match cli.command {
        Commands::Methods => {
            let methods = facade.list_methods().await?;
            println!("{}", serde_json::to_string_pretty(&methods)?);
        }
        Commands::MethodName { id } => match facade.method_name(Some(&id)).await? {
            Some(name) => println!("{}", name),
            None => {
                eprintln!("✗ Unknown payment method: {}", id);
                std::process::exit(1);
            }
        },
        Commands::Banks => {
            let banks = facade.list_banks().await?;
            println!("{}", serde_json::to_string_pretty(&banks)?);
        }
        Commands::Start {
            currency,
            amount,
            return_path,
            description,
            language,
            ip,
        } => {
            let req = StartTransactionRequest::new(currency, amount, return_path, description)
                .with_language(language);
            let result = facade.start_transaction(req, ip).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Status { id } => {
            let data = facade.get_transaction(&TransactionId::new(id)).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Commands::Exchange { order_id, action } => {
            let callback = ExchangeCallback {
                action,
                order_id,
                extra1: None,
                extra2: None,
                extra3: None,
            };
            let data = facade.get_for_exchange(&callback).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("paynl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_environment() {
        let cli = parse(&["--token", "from-flag", "--url-prefix", "https://cli.test", "methods"]);
        let config = cli
            .gateway_config(env(&[
                ("PAY_TOKEN", "from-env"),
                ("PAY_SERVICE_ID", "SL-1234-5678"),
                ("PAY_URL_PREFIX", "https://env.test"),
            ]))
            .unwrap();
        assert_eq!(config.api_token, "from-flag");
        assert_eq!(config.service_id, "SL-1234-5678");
        assert_eq!(config.url_prefix, "https://cli.test");
    }

    #[test]
    fn test_url_prefix_falls_back_to_app_url() {
        let cli = parse(&["banks"]);
        let config = cli
            .gateway_config(env(&[
                ("PAY_TOKEN", "abc"),
                ("PAY_SERVICE_ID", "SL-1234-5678"),
                ("APP_URL", "https://shop.test"),
            ]))
            .unwrap();
        assert_eq!(config.url_prefix, "https://shop.test");
        assert!(!config.test_mode);
    }

    #[test]
    fn test_test_mode_parsing_matches_server() {
        let base = [("PAY_TOKEN", "abc"), ("PAY_SERVICE_ID", "SL-1234-5678")];

        let bare = parse(&["--test-mode", "methods"]);
        assert!(bare.gateway_config(env(&base)).unwrap().test_mode);

        let off = parse(&["--test-mode=false", "methods"]);
        assert!(!off.gateway_config(env(&base)).unwrap().test_mode);

        let invalid = parse(&["--test-mode=maybe", "methods"]);
        assert!(matches!(
            invalid.gateway_config(env(&base)),
            Err(ConfigError::Invalid(_))
        ));

        let from_env = parse(&["methods"]);
        let mut vars = base.to_vec();
        vars.push(("PAY_TESTMODE", "maybe"));
        assert!(matches!(
            from_env.gateway_config(env(&vars)),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_token_is_reported() {
        let cli = parse(&["methods"]);
        assert_eq!(
            cli.gateway_config(env(&[("PAY_SERVICE_ID", "SL-1234-5678")])),
            Err(ConfigError::MissingApiToken)
        );
    }
}
