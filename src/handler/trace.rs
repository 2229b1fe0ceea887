use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use futures::StreamExt;
use futures::stream;
use tracing::debug;
use tracing::info;

use super::classify::classify_addresses;
use super::state::TraceState;
use crate::config::TracerConfig;
use crate::error::SourceError;
use crate::error::TraceError;
use crate::model::Address;
use crate::model::TraceParams;
use crate::model::TraceRequest;
use crate::model::TraceResult;
use crate::pipeline::datasource::FetchOutcome;
use crate::pipeline::datasource::TransferSource;

/// Breadth-first tracer of token flow around a wallet.
///
/// Hops run one after another; inside a hop every frontier address is queried
/// concurrently and the answers are merged in frontier order once all have arrived.
#[derive(Clone)]
pub struct Tracer {
    source: Arc<dyn TransferSource>,
    config: TracerConfig,
}

impl Tracer {
    pub fn new(
        source: Arc<dyn TransferSource>,
        config: TracerConfig,
    ) -> Self {
        Self { source, config }
    }

    pub async fn trace(
        &self,
        request: &TraceRequest,
    ) -> Result<TraceResult, TraceError> {
        let params = TraceParams::from_request(request)?;
        let started = Instant::now();

        info!(
            "trace_started::wallet::{}::token::{}::direction::{}::max_hops::{}::limit::{}",
            params.wallet, params.token, params.direction, params.max_hops, params.per_address_limit
        );

        let mut state = TraceState::new(params.wallet.clone(), params.direction);

        for hop in 0..params.max_hops {
            if state.frontier().is_empty() {
                debug!("frontier_exhausted::hop::{}", hop);
                break;
            }

            let results = self.fetch_frontier(&params, state.frontier()).await;
            let report = state.merge_hop(results);

            info!(
                "hop_completed::hop::{}::queried::{}::empty::{}::failed::{}::edges_added::{}::next_frontier::{}",
                report.hop, report.queried, report.empty, report.failed, report.edges_added, report.next_frontier
            );
        }

        let targets = state.classification_targets();
        let outcomes = classify_addresses(self.source.as_ref(), &targets).await;
        state.apply_classifications(outcomes);
        state.finish_start_node();

        let result = state.into_result(&params);

        info!(
            "trace_completed::wallet::{}::nodes::{}::edges::{}::start_transfers::{}::elapsed_ms::{}",
            result.wallet,
            result.summary.node_count,
            result.summary.edge_count,
            result.summary.start_transfer_count,
            started.elapsed().as_millis()
        );

        Ok(result)
    }

    /// [`Tracer::trace`] bounded by a caller-level deadline.
    pub async fn trace_with_deadline(
        &self,
        request: &TraceRequest,
        deadline: Duration,
    ) -> Result<TraceResult, TraceError> {
        tokio::time::timeout(deadline, self.trace(request))
            .await
            .map_err(|_| TraceError::DeadlineExceeded(deadline.as_secs()))?
    }

    async fn fetch_frontier(
        &self,
        params: &TraceParams,
        frontier: &[Address],
    ) -> Vec<(Address, Result<FetchOutcome, SourceError>)> {
        let source = self.source.as_ref();
        let token = &params.token;
        let limit = params.per_address_limit;

        stream::iter(frontier.iter().cloned())
            .map(|address| async move {
                let outcome = source.fetch_transfers(&address, token, limit).await;
                (address, outcome)
            })
            .buffered(self.config.max_concurrent_requests.max(1))
            .collect()
            .await
    }
}
