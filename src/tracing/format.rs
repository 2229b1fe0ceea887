use std::fmt::Write as _;

use tracing::Event;
use tracing::Level;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::FormatFields;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::registry::LookupSpan;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `LEVEL timestamp::engine::file::line::message`, with the location left out on the terminal.
#[derive(Debug, Clone)]
pub struct AtharFormat {
    pub engine_name: String,
    pub with_location: bool,
}

impl AtharFormat {
    pub fn file(engine_name: &str) -> Self {
        Self {
            engine_name: engine_name.to_string(),
            with_location: true,
        }
    }

    pub fn terminal(engine_name: &str) -> Self {
        Self {
            engine_name: engine_name.to_string(),
            with_location: false,
        }
    }

    /// Everything before the message fields.
    pub fn header(
        &self,
        level: &Level,
        timestamp: &str,
        file: &str,
        line: u32,
    ) -> String {
        let mut header = format!("{} {}::{}::", level, timestamp, self.engine_name);
        if self.with_location {
            let _ = write!(header, "{}::{}::", file.strip_prefix("src/").unwrap_or(file), line);
        }
        header
    }
}

impl<S, N> FormatEvent<S, N> for AtharFormat
where
    S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();

        // events without a source location come from macros outside our code
        let Some(file) = metadata.file() else {
            if !cfg!(feature = "deep-trace") {
                return Ok(());
            }
            return self.write_event(ctx, &mut writer, event, "unknown", 0);
        };

        self.write_event(ctx, &mut writer, event, file, metadata.line().unwrap_or(0))
    }
}

impl AtharFormat {
    fn write_event<S, N>(
        &self,
        ctx: &FmtContext<'_, S, N>,
        writer: &mut Writer<'_>,
        event: &Event<'_>,
        file: &str,
        line: u32,
    ) -> std::fmt::Result
    where
        S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
        N: for<'writer> FormatFields<'writer> + 'static,
    {
        let timestamp = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
        write!(writer, "{}", self.header(event.metadata().level(), &timestamp, file, line))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
