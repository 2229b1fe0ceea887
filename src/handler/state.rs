use std::collections::HashSet;

use tracing::debug;
use tracing::warn;

use super::classify::ClassifyOutcome;
use crate::constants::CLASSIFY_LIMIT;
use crate::constants::START_LABEL_PREFIX;
use crate::constants::START_TRANSFER_LIMIT;
use crate::error::SourceError;
use crate::model::Address;
use crate::model::EdgeKey;
use crate::model::GraphSnapshot;
use crate::model::NodeKind;
use crate::model::StartTransfer;
use crate::model::TokenTransfer;
use crate::model::TraceDirection;
use crate::model::TraceGraph;
use crate::model::TraceParams;
use crate::model::TraceResult;
use crate::model::TraceSummary;
use crate::model::TransferDirection;
use crate::model::TransferEdge;
use crate::pipeline::datasource::FetchOutcome;

/// What one hop did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HopReport {
    pub hop: u32,
    pub queried: usize,
    pub empty: usize,
    pub failed: usize,
    pub edges_added: usize,
    pub next_frontier: usize,
}

/// Everything one trace accumulates between hops. Owned by a single trace call.
#[derive(Debug, Clone)]
pub struct TraceState {
    start: Address,
    direction: TraceDirection,
    graph: TraceGraph,
    frontier: Vec<Address>,
    visited: HashSet<Address>,
    classify_queue: Vec<Address>,
    start_transfers: Vec<StartTransfer>,
    hops_completed: u32,
}

impl TraceState {
    /// The start address is the whole initial frontier, already visited, and first in
    /// the classification queue.
    pub fn new(
        start: Address,
        direction: TraceDirection,
    ) -> Self {
        let mut graph = TraceGraph::new();
        graph.upsert_node(&start, None);

        let mut visited = HashSet::new();
        visited.insert(start.clone());

        Self {
            frontier: vec![start.clone()],
            classify_queue: vec![start.clone()],
            start,
            direction,
            graph,
            visited,
            start_transfers: Vec::new(),
            hops_completed: 0,
        }
    }

    pub fn frontier(&self) -> &[Address] {
        &self.frontier
    }

    pub fn visited(&self) -> &HashSet<Address> {
        &self.visited
    }

    pub fn classify_queue(&self) -> &[Address] {
        &self.classify_queue
    }

    pub fn graph(&self) -> &TraceGraph {
        &self.graph
    }

    pub fn start_transfers(&self) -> &[StartTransfer] {
        &self.start_transfers
    }

    pub fn hops_completed(&self) -> u32 {
        self.hops_completed
    }

    /// Fold the fetch results of every frontier address into the graph and replace the
    /// frontier with the addresses discovered this hop.
    pub fn merge_hop(
        &mut self,
        results: Vec<(Address, Result<FetchOutcome, SourceError>)>,
    ) -> HopReport {
        let mut report = HopReport {
            hop: self.hops_completed,
            queried: results.len(),
            ..Default::default()
        };
        let mut next_frontier = Vec::new();

        for (address, outcome) in results {
            match outcome {
                Ok(FetchOutcome::Transfers(transfers)) => {
                    report.edges_added += self.merge_transfers(&address, transfers, &mut next_frontier);
                },
                Ok(FetchOutcome::NoResults) => {
                    debug!("no_transfers::hop::{}::address::{}", report.hop, address);
                    report.empty += 1;
                },
                Err(e) => {
                    warn!("fetch_transfers_failed::hop::{}::address::{}::error::{}", report.hop, address, e);
                    report.failed += 1;
                },
            }
        }

        report.next_frontier = next_frontier.len();
        self.frontier = next_frontier;
        self.hops_completed += 1;

        report
    }

    /// Returns the number of edges that were new to the graph.
    fn merge_transfers(
        &mut self,
        queried: &Address,
        transfers: Vec<TokenTransfer>,
        next_frontier: &mut Vec<Address>,
    ) -> usize {
        let mut edges_added = 0;

        for transfer in transfers {
            let (from, to) = match (Address::parse(&transfer.from), Address::parse(&transfer.to)) {
                (Ok(from), Ok(to)) => (from, to),
                _ => {
                    warn!(
                        "skipping_transfer_with_invalid_address::hash::{}::from::{}::to::{}",
                        transfer.hash, transfer.from, transfer.to
                    );
                    continue;
                },
            };

            let is_out = from == *queried;
            let is_in = to == *queried;

            if *queried == self.start {
                let direction = if from == self.start { TransferDirection::Out } else { TransferDirection::In };
                self.start_transfers.push(StartTransfer::new(transfer.clone(), direction));
            }

            if !self.direction.includes(is_in, is_out) {
                continue;
            }

            self.ensure_node(&from);
            self.ensure_node(&to);

            let key = EdgeKey::from_transfer(&transfer, &from, &to);
            let edge = TransferEdge::from_transfer(&key, &transfer);
            if self.graph.upsert_edge(key, edge) {
                edges_added += 1;
            }

            if self.direction.follows_recipients() && is_out && self.visited.insert(to.clone()) {
                next_frontier.push(to.clone());
            }

            if self.direction.follows_senders() && is_in && self.visited.insert(from.clone()) {
                next_frontier.push(from);
            }
        }

        edges_added
    }

    fn ensure_node(
        &mut self,
        address: &Address,
    ) {
        if self.graph.upsert_node(address, None) && self.classify_queue.len() < CLASSIFY_LIMIT {
            self.classify_queue.push(address.clone());
        }
    }

    /// Queue contents in first-seen order, without repeats, capped at the classification limit.
    pub fn classification_targets(&self) -> Vec<Address> {
        let mut seen = HashSet::new();
        self.classify_queue
            .iter()
            .filter(|address| seen.insert(*address))
            .take(CLASSIFY_LIMIT)
            .cloned()
            .collect()
    }

    pub fn apply_classifications(
        &mut self,
        outcomes: Vec<(Address, ClassifyOutcome)>,
    ) {
        for (address, outcome) in outcomes {
            if let ClassifyOutcome::Classified(kind) = outcome {
                self.graph.upsert_node(&address, Some(kind));
            }
        }
    }

    /// Default the origin to a wallet when classification left it unknown, and mark it as the origin.
    pub fn finish_start_node(&mut self) {
        let start = self.start.clone();
        self.graph.upsert_node(&start, Some(NodeKind::Wallet));
        self.graph.set_label(&start, format!("{}{}", START_LABEL_PREFIX, start.short()));
    }

    pub fn into_result(
        self,
        params: &TraceParams,
    ) -> TraceResult {
        let mut start_transfers = self.start_transfers;
        start_transfers.sort_by(|a, b| b.transfer.timestamp().cmp(&a.transfer.timestamp()));
        start_transfers.truncate(START_TRANSFER_LIMIT);

        let graph = GraphSnapshot {
            nodes: self.graph.nodes(),
            edges: self.graph.edges(),
        };

        let summary = TraceSummary {
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            start_transfer_count: start_transfers.len(),
        };

        TraceResult {
            wallet: params.wallet.clone(),
            token: params.token.clone(),
            direction: params.direction,
            max_hops: params.max_hops,
            per_address_limit: params.per_address_limit,
            graph,
            summary,
            start_transfers,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn addr(n: u32) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn transfer(
        from: &Address,
        to: &Address,
        hash: &str,
        timestamp: i64,
    ) -> TokenTransfer {
        TokenTransfer {
            hash: hash.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            value: "1".to_string(),
            token_decimal: "0".to_string(),
            time_stamp: timestamp.to_string(),
            transaction_index: "0".to_string(),
            ..Default::default()
        }
    }

    fn hop(
        state: &mut TraceState,
        batches: Vec<(Address, Vec<TokenTransfer>)>,
    ) -> HopReport {
        state.merge_hop(
            batches.into_iter().map(|(address, transfers)| (address, Ok(FetchOutcome::Transfers(transfers)))).collect(),
        )
    }

    #[test]
    fn downstream_follows_outgoing_only() {
        let (a, b, c) = (addr(1), addr(2), addr(3));
        let mut state = TraceState::new(a.clone(), TraceDirection::Downstream);

        let report = hop(&mut state, vec![(a.clone(), vec![transfer(&a, &b, "0x01", 1), transfer(&c, &a, "0x02", 2)])]);

        assert_eq!(report.edges_added, 1);
        assert_eq!(state.frontier(), &[b.clone()]);
        assert!(!state.graph().contains_node(&c));
        assert_eq!(state.start_transfers().len(), 2, "start report ignores the direction filter");
    }

    #[test]
    fn upstream_follows_incoming_only() {
        let (a, b, c) = (addr(1), addr(2), addr(3));
        let mut state = TraceState::new(a.clone(), TraceDirection::Upstream);

        hop(&mut state, vec![(a.clone(), vec![transfer(&a, &b, "0x01", 1), transfer(&c, &a, "0x02", 2)])]);

        assert_eq!(state.frontier(), &[c.clone()]);
        assert!(!state.graph().contains_node(&b));
        let edges = state.graph().edges();
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].source.clone(), edges[0].target.clone()), (c, a), "edges keep chain order");
    }

    #[test]
    fn both_grows_each_way_independently() {
        let (a, b, c) = (addr(1), addr(2), addr(3));
        let mut state = TraceState::new(a.clone(), TraceDirection::Both);

        hop(&mut state, vec![(a.clone(), vec![transfer(&a, &b, "0x01", 1), transfer(&c, &a, "0x02", 2)])]);

        assert_eq!(state.frontier(), &[b, c]);
        assert_eq!(state.graph().edge_count(), 2);
    }

    #[test]
    fn self_transfer_makes_loop_without_requeue() {
        let a = addr(1);
        let mut state = TraceState::new(a.clone(), TraceDirection::Both);

        hop(&mut state, vec![(a.clone(), vec![transfer(&a, &a, "0x01", 1)])]);

        assert!(state.frontier().is_empty());
        assert_eq!(state.graph().edge_count(), 1);
        assert_eq!(state.graph().node_count(), 1);
    }

    #[test]
    fn transfer_seen_from_both_sides_is_one_edge() {
        let (a, b) = (addr(1), addr(2));
        let mut state = TraceState::new(a.clone(), TraceDirection::Both);
        let shared = transfer(&a, &b, "0x01", 1);

        hop(&mut state, vec![(a.clone(), vec![shared.clone()])]);
        let report = hop(&mut state, vec![(b.clone(), vec![shared])]);

        assert_eq!(report.edges_added, 0);
        assert_eq!(state.graph().edge_count(), 1);
        assert!(state.frontier().is_empty());
    }

    #[test]
    fn failures_and_empty_answers_are_counted_not_fatal() {
        let (a, b, c) = (addr(1), addr(2), addr(3));
        let mut state = TraceState::new(a.clone(), TraceDirection::Downstream);
        hop(&mut state, vec![(a.clone(), vec![transfer(&a, &b, "0x01", 1), transfer(&a, &c, "0x02", 1)])]);

        let d = addr(4);
        let report = state.merge_hop(vec![
            (b.clone(), Err(SourceError::Status(502))),
            (c.clone(), Ok(FetchOutcome::Transfers(vec![transfer(&c, &d, "0x03", 3)]))),
        ]);

        assert_eq!(report.failed, 1);
        assert_eq!(report.edges_added, 1);
        assert_eq!(state.frontier(), &[d]);
        assert_eq!(state.hops_completed(), 2);
    }

    #[test]
    fn invalid_counterparty_is_skipped() {
        let a = addr(1);
        let mut state = TraceState::new(a.clone(), TraceDirection::Downstream);
        let mut broken = transfer(&a, &addr(2), "0x01", 1);
        broken.to = "0xnothex".to_string();

        let report = hop(&mut state, vec![(a.clone(), vec![broken])]);

        assert_eq!(report.edges_added, 0);
        assert!(state.start_transfers().is_empty());
    }

    #[test]
    fn classify_queue_is_capped() {
        let a = addr(1);
        let mut state = TraceState::new(a.clone(), TraceDirection::Downstream);
        let transfers = (2..40).map(|n| transfer(&a, &addr(n), &format!("0x{:02x}", n), 1)).collect();

        hop(&mut state, vec![(a.clone(), transfers)]);

        assert_eq!(state.graph().node_count(), 39);
        assert_eq!(state.classify_queue().len(), CLASSIFY_LIMIT);
        assert_eq!(state.classification_targets()[0], a);
        assert_eq!(state.classification_targets().last(), Some(&addr(25)));
    }

    #[test]
    fn start_node_defaults_to_wallet_and_is_labelled() {
        let a = addr(1);
        let mut state = TraceState::new(a.clone(), TraceDirection::Downstream);
        state.apply_classifications(vec![(a.clone(), ClassifyOutcome::Failed("timeout".into()))]);
        state.finish_start_node();

        let node = state.graph().node(&a).cloned().unwrap();
        assert_eq!(node.kind, NodeKind::Wallet);
        assert_eq!(node.label, format!("start · {}", a.short()));
    }

    #[test]
    fn classified_contract_start_is_kept() {
        let a = addr(1);
        let mut state = TraceState::new(a.clone(), TraceDirection::Downstream);
        state.apply_classifications(vec![(a.clone(), ClassifyOutcome::Classified(NodeKind::Contract))]);
        state.finish_start_node();

        assert_eq!(state.graph().node(&a).map(|n| n.kind), Some(NodeKind::Contract));
    }

    #[test]
    fn start_transfers_sorted_and_truncated() {
        let a = addr(1);
        let params = TraceParams {
            wallet: a.clone(),
            token: addr(99),
            direction: TraceDirection::Downstream,
            max_hops: 1,
            per_address_limit: 200,
        };
        let mut state = TraceState::new(a.clone(), params.direction);
        let transfers = (0..150).map(|n| transfer(&a, &addr(1000 + n), &format!("0x{:x}", n), n as i64)).collect();
        hop(&mut state, vec![(a.clone(), transfers)]);

        let result = state.into_result(&params);

        assert_eq!(result.start_transfers.len(), 100);
        assert_eq!(result.summary.start_transfer_count, 100);
        assert_eq!(result.start_transfers[0].transfer.timestamp(), 149);
        assert_eq!(result.start_transfers[99].transfer.timestamp(), 50);
        assert_eq!(result.summary.edge_count, 150);
    }
}
