use std::{
    fs,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::{Context, Result};
use tracing::Metadata;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    prelude::*,
};

use crate::config::LogConfig;

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`. Keep the guard alive until exit
    /// or buffered lines are lost.
    pub fn init_tracing(config: &LogConfig) -> Result<WorkerGuard> {
        fs::create_dir_all(&config.dir)
            .with_context(|| format!("cannot create log dir {}", config.dir.display()))?;

        SEQ.get_or_init(|| AtomicUsize::new(1));

        // daily rolling file appender → <dir>/<prefix>.YYYY-MM-DD
        let file = rolling::daily(&config.dir, &config.file_prefix);
        let (file_writer, guard) = tracing_appender::non_blocking(file);

        let directive: Directive = config
            .level
            .parse()
            .with_context(|| format!("invalid log level {:?}", config.level))?;
        let make_filter = || EnvFilter::from_default_env().add_directive(directive.clone());

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(file_writer)
            .with_ansi(false)
            .with_filter(make_filter());

        // optional stderr layer for live debugging
        let stderr_layer = config.stderr.then(|| {
            fmt::layer()
                .event_format(SeqFileMod)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_filter(make_filter())
        });

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        Ok(guard)
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically-increasing sequence number
        let seq: usize = SEQ
            .get_or_init(|| AtomicUsize::new(1))
            .fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        // write all key-value pairs for this event (usually just the message)
        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
