//! Compiler log lines: `LEVEL target: stage{name="Fua"}: message`.
//!
//! Every loader stage runs inside an `info_span!("stage", name = ...)`. The
//! default fmt layer prints that span before the target, which pushes the
//! module path to the middle of the line and makes stage output hard to
//! scan. This formatter leads with the target and then prints each entered
//! span with its recorded fields, so a warning about a skipped row reads
//! `WARN rad_compiler::loader::enroute_dct: stage{name="EnrouteDct"}: ...`.
//!
//! Colour is only emitted when the writer supports ANSI escapes, so logs
//! redirected to a file stay plain.

use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::{FmtContext, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter that leads with the target and keeps span fields.
pub struct TargetFirstFormat;

fn level_colour(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[31m",
        Level::WARN => "\x1b[33m",
        Level::INFO => "\x1b[32m",
        Level::DEBUG => "\x1b[34m",
        Level::TRACE => "\x1b[35m",
    }
}

impl<S, N> FormatEvent<S, N> for TargetFirstFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let level = metadata.level();

        if writer.has_ansi_escapes() {
            write!(writer, "{}{:>5}\x1b[0m ", level_colour(level), level)?;
        } else {
            write!(writer, "{:>5} ", level)?;
        }
        write!(writer, "{}: ", metadata.target())?;

        // Outermost span first.
        let spans = ctx.event_scope().into_iter().flat_map(|scope| scope.from_root());
        for span in spans {
            write!(writer, "{}", span.name())?;
            let extensions = span.extensions();
            if let Some(fields) = extensions.get::<FormattedFields<N>>()
                && !fields.is_empty()
            {
                write!(writer, "{{{}}}", fields)?;
            }
            write!(writer, ": ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
