pub mod classify;
pub mod state;
pub mod trace;

pub use classify::ClassifyOutcome;
pub use classify::classify_addresses;
pub use state::HopReport;
pub use state::TraceState;
pub use trace::Tracer;
