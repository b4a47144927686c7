//! Terminal log formatting.

use colored::Colorize;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Tracing event formatter that colors each line by severity and drops the
/// timestamp/level prefix, keeping benchmark output easy to scan next to the
/// streamed result lines.
pub struct ColorizedFormatter;

impl<S, N> FormatEvent<S, N> for ColorizedFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        // Render the fields into a buffer first so the color applies to the
        // whole line.
        let mut line = String::new();
        ctx.format_fields(Writer::new(&mut line), event)?;

        let colored = match *event.metadata().level() {
            Level::ERROR => format!("error: {}", line).red(),
            Level::WARN => format!("warning: {}", line).yellow(),
            Level::INFO => line.normal(),
            Level::DEBUG => line.blue(),
            Level::TRACE => line.dimmed(),
        };

        writeln!(writer, "{}", colored)
    }
}
