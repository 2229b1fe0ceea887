use futures::future::join_all;
use tracing::debug;
use tracing::warn;

use crate::constants::CLASSIFY_LIMIT;
use crate::model::Address;
use crate::model::NodeKind;
use crate::pipeline::datasource::TransferSource;

/// Per-address classification result. A failure is a final answer, not an error to propagate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyOutcome {
    Classified(NodeKind),
    Failed(String),
}

/// Ask the source whether each address holds code, all at once. Only the first
/// [`CLASSIFY_LIMIT`] addresses are looked at.
pub async fn classify_addresses(
    source: &dyn TransferSource,
    addresses: &[Address],
) -> Vec<(Address, ClassifyOutcome)> {
    let lookups = addresses.iter().take(CLASSIFY_LIMIT).map(|address| async move {
        let outcome = match source.is_contract(address).await {
            Ok(true) => ClassifyOutcome::Classified(NodeKind::Contract),
            Ok(false) => ClassifyOutcome::Classified(NodeKind::Wallet),
            Err(e) => {
                warn!("classify_failed::address::{}::error::{}", address, e);
                ClassifyOutcome::Failed(e.to_string())
            },
        };
        (address.clone(), outcome)
    });

    let outcomes = join_all(lookups).await;
    debug!(
        "classification_completed::requested::{}::failed::{}",
        outcomes.len(),
        outcomes.iter().filter(|(_, outcome)| matches!(outcome, ClassifyOutcome::Failed(_))).count()
    );
    outcomes
}
