use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::Result;
use crate::config::Config;
use crate::config::load_config_or_default;
use crate::err_with_loc;
use crate::error::TraceError;
use crate::handler::trace::Tracer;
use crate::model::TraceRequest;
use crate::model::TraceResult;
use crate::pipeline::datasource::EtherscanClient;
use crate::tracing::setup_tracing;

#[derive(Debug, Clone, Parser)]
#[command(name = "athar", version, about = "Trace ERC-20 token flow hop by hop around a wallet")]
pub struct Cli {
    /// Wallet the trace starts from
    #[arg(long)]
    pub wallet: String,

    /// ERC-20 contract whose transfers are followed
    #[arg(long)]
    pub token: String,

    /// upstream, downstream or both
    #[arg(long, default_value = "downstream")]
    pub direction: String,

    /// Clamped to 1..=4
    #[arg(long, allow_negative_numbers = true)]
    pub max_hops: Option<i64>,

    /// Transfers fetched per address, clamped to 10..=200
    #[arg(long = "limit", allow_negative_numbers = true)]
    pub per_address_limit: Option<i64>,

    #[arg(long, default_value = "Config.toml")]
    pub config: PathBuf,

    /// Overrides tracer.trace_deadline_secs
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    pub fn to_request(&self) -> TraceRequest {
        TraceRequest {
            wallet: self.wallet.clone(),
            token: self.token.clone(),
            direction: Some(self.direction.clone()),
            max_hops: self.max_hops,
            per_address_limit: self.per_address_limit,
        }
    }
}

#[derive(Clone)]
pub struct Athar {
    pub config: Config,
    pub tracer: Tracer,
}

impl Athar {
    pub fn new(config: Config) -> std::result::Result<Self, TraceError> {
        if config.explorer.api_key.is_none() {
            warn!("explorer_api_key_missing::requests_will_be_rate_limited");
        }

        let source = EtherscanClient::new(config.explorer.clone())
            .map_err(|e| TraceError::Unexpected(format!("explorer client setup failed: {}", e)))?;
        let tracer = Tracer::new(Arc::new(source), config.tracer.clone());

        Ok(Self { config, tracer })
    }

    pub async fn run() -> Result<()> {
        let cli = Cli::parse();

        dotenvy::dotenv().ok();
        let config = load_config_or_default(&cli.config)?;

        setup_tracing("athar", &config.logging)?;
        info!("Starting Athar (أثر): The Tracer");

        let deadline = Duration::from_secs(cli.deadline_secs.unwrap_or(config.tracer.trace_deadline_secs));
        let request = cli.to_request();

        let outcome = match Athar::new(config) {
            Ok(athar) => {
                tokio::select! {
                    outcome = athar.tracer.trace_with_deadline(&request, deadline) => outcome,
                    _ = tokio::signal::ctrl_c() => {
                        info!("termination_signal::trace_aborted");
                        Err(TraceError::Unexpected("interrupted".to_string()))
                    },
                }
            },
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                println!("{}", render_result(&result, cli.pretty)?);
                Ok(())
            },
            Err(e) => {
                error!("trace_failed::kind::{}::error::{}", e.kind(), e);
                println!("{}", json!({ "error": e.to_failure() }));
                Err(err_with_loc!(e))
            },
        }
    }
}

pub fn render_result(
    result: &TraceResult,
    pretty: bool,
) -> Result<String> {
    let rendered = if pretty { serde_json::to_string_pretty(result)? } else { serde_json::to_string(result)? };
    Ok(rendered)
}
