pub mod address;
pub mod graph;
pub mod trace;
pub mod transfer;

pub use address::Address;
pub use address::InvalidAddress;
pub use graph::AddressNode;
pub use graph::EdgeKey;
pub use graph::NodeKind;
pub use graph::TraceGraph;
pub use graph::TransferEdge;
pub use trace::GraphSnapshot;
pub use trace::TraceDirection;
pub use trace::TraceParams;
pub use trace::TraceRequest;
pub use trace::TraceResult;
pub use trace::TraceSummary;
pub use transfer::StartTransfer;
pub use transfer::TokenTransfer;
pub use transfer::TransferDirection;
