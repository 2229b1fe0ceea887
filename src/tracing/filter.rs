use tracing::Level;
use tracing::Metadata;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::Filter;
use tracing_subscriber::registry::LookupSpan;

/// Only events emitted from this crate are written anywhere
pub const TARGET_PREFIX: &str = "athar";

/// Which levels a sink accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelBand {
    Exactly(Level),
    WarnAndError,
    /// The given level and everything more severe
    AtLeast(Level),
}

impl LevelBand {
    pub fn admits(
        self,
        level: &Level,
    ) -> bool {
        match self {
            LevelBand::Exactly(expected) => *level == expected,
            LevelBand::WarnAndError => *level == Level::WARN || *level == Level::ERROR,
            // tracing orders more verbose levels as greater
            LevelBand::AtLeast(threshold) => *level <= threshold,
        }
    }
}

/// Per-layer filter: a level band applied to this crate's targets only.
#[derive(Debug, Clone, Copy)]
pub struct CrateFilter {
    band: LevelBand,
}

impl CrateFilter {
    pub fn new(band: LevelBand) -> Self {
        Self { band }
    }

    /// Debug log file
    pub fn debug_file() -> Self {
        Self::new(LevelBand::Exactly(Level::DEBUG))
    }

    /// Error log file
    pub fn error_file() -> Self {
        Self::new(LevelBand::WarnAndError)
    }

    /// Terminal: info and above in dev builds, errors only otherwise
    pub fn terminal() -> Self {
        if cfg!(feature = "dev") {
            Self::new(LevelBand::AtLeast(Level::INFO))
        } else {
            Self::new(LevelBand::Exactly(Level::ERROR))
        }
    }

    pub fn admits(
        &self,
        meta: &Metadata<'_>,
    ) -> bool {
        meta.target().starts_with(TARGET_PREFIX) && self.band.admits(meta.level())
    }
}

impl<S> Filter<S> for CrateFilter
where
    S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn enabled(
        &self,
        meta: &Metadata<'_>,
        _ctx: &Context<'_, S>,
    ) -> bool {
        self.admits(meta)
    }
}
