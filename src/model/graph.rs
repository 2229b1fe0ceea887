use std::collections::HashMap;

use petgraph::Graph;
use petgraph::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use super::address::Address;
use super::transfer::TokenTransfer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Wallet,
    Contract,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressNode {
    pub id: Address,
    pub label: String,
    pub kind: NodeKind,
}

/// Identity of a transfer edge. The same transfer seen while querying either side
/// produces the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub hash: String,
    pub tx_index: String,
    pub from: Address,
    pub to: Address,
    pub value: String,
}

impl EdgeKey {
    pub fn from_transfer(
        transfer: &TokenTransfer,
        from: &Address,
        to: &Address,
    ) -> Self {
        Self {
            hash: transfer.hash.clone(),
            tx_index: transfer.transaction_index.clone(),
            from: from.clone(),
            to: to.clone(),
            value: transfer.value.clone(),
        }
    }

    pub fn id(&self) -> String {
        format!("{}:{}:{}:{}:{}", self.hash, self.tx_index, self.from, self.to, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEdge {
    pub id: String,
    pub source: Address,
    pub target: Address,
    pub label: String,
    pub tx_hash: String,
    pub timestamp: i64,
    pub value: String,
    pub symbol: String,
}

impl TransferEdge {
    pub fn from_transfer(
        key: &EdgeKey,
        transfer: &TokenTransfer,
    ) -> Self {
        Self {
            id: key.id(),
            source: key.from.clone(),
            target: key.to.clone(),
            label: transfer.amount_label(),
            tx_hash: transfer.hash.clone(),
            timestamp: transfer.timestamp(),
            value: transfer.value.clone(),
            symbol: transfer.token_symbol.clone(),
        }
    }
}

/// Nodes and edges discovered by one trace, deduplicated by address and [`EdgeKey`].
#[derive(Debug, Clone, Default)]
pub struct TraceGraph {
    graph: Graph<AddressNode, TransferEdge>,
    node_indices: HashMap<Address, NodeIndex>,
    edge_indices: HashMap<EdgeKey, EdgeIndex>,
}

impl TraceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the node with `unknown` kind if absent. A given kind only replaces
    /// `unknown`, so a node is upgraded at most once. Returns true when the node was created.
    pub fn upsert_node(
        &mut self,
        address: &Address,
        kind: Option<NodeKind>,
    ) -> bool {
        if let Some(&idx) = self.node_indices.get(address) {
            if let (Some(kind), Some(node)) = (kind, self.graph.node_weight_mut(idx)) {
                if node.kind == NodeKind::Unknown {
                    node.kind = kind;
                }
            }
            return false;
        }

        let node = AddressNode {
            id: address.clone(),
            label: address.short(),
            kind: kind.unwrap_or_default(),
        };

        let idx = self.graph.add_node(node);
        self.node_indices.insert(address.clone(), idx);

        true
    }

    /// Insert-if-absent. Endpoints are created when missing so no edge ever dangles.
    /// Returns true when the edge was inserted.
    pub fn upsert_edge(
        &mut self,
        key: EdgeKey,
        edge: TransferEdge,
    ) -> bool {
        if self.edge_indices.contains_key(&key) {
            return false;
        }

        self.upsert_node(&key.from, None);
        self.upsert_node(&key.to, None);
        let from_idx = self.node_indices[&key.from];
        let to_idx = self.node_indices[&key.to];

        let idx = self.graph.add_edge(from_idx, to_idx, edge);
        self.edge_indices.insert(key, idx);

        true
    }

    pub fn set_label(
        &mut self,
        address: &Address,
        label: String,
    ) {
        if let Some(node) = self.node_indices.get(address).and_then(|&idx| self.graph.node_weight_mut(idx)) {
            node.label = label;
        }
    }

    pub fn node(
        &self,
        address: &Address,
    ) -> Option<&AddressNode> {
        self.node_indices.get(address).and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn contains_node(
        &self,
        address: &Address,
    ) -> bool {
        self.node_indices.contains_key(address)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> Vec<AddressNode> {
        self.graph.node_weights().cloned().collect()
    }

    /// Newest first. Edge weights iterate in insertion order and the sort is stable,
    /// so equal timestamps keep the order they were discovered in.
    pub fn edges(&self) -> Vec<TransferEdge> {
        let mut edges: Vec<TransferEdge> = self.graph.edge_weights().cloned().collect();
        edges.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        edges
    }

    pub fn outgoing(
        &self,
        address: &Address,
    ) -> Vec<&TransferEdge> {
        self.node_indices
            .get(address)
            .map(|&idx| self.graph.edges_directed(idx, Direction::Outgoing).map(|e| e.weight()).collect())
            .unwrap_or_default()
    }
}
