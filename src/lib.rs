pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod handler;
pub mod model;
pub mod pipeline;
pub mod tracing;
pub mod utils;

pub use error::ConfigError;
pub use error::SourceError;
pub use error::TraceError;
pub use error::TraceFailure;
pub use handler::trace::Tracer;
pub use model::TraceRequest;
pub use model::TraceResult;
pub use pipeline::datasource::EtherscanClient;
pub use pipeline::datasource::FetchOutcome;
pub use pipeline::datasource::TransferSource;

pub use error::Result;
