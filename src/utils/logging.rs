use std::fs;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{filter::Targets, fmt, fmt::time::UtcTime, prelude::*, EnvFilter};

/// Keeps the non-blocking writers flushing; drop only at exit.
pub struct LogGuards {
    _normal: WorkerGuard,
    _perf: WorkerGuard,
    _cron: WorkerGuard,
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

pub fn setup_logging(log_dir: &str, svc: &str, level: &str) -> anyhow::Result<LogGuards> {
    // -----------------------
    // Normal Logs
    // -----------------------
    let normal_log_dir = format!("{}/{}", log_dir, svc);
    fs::create_dir_all(&normal_log_dir)?;
    let (normal_writer, normal_guard) = tracing_appender::non_blocking(rolling::daily(
        normal_log_dir,
        format!("{}.log", svc),
    ));

    let normal_layer = fmt::layer()
        .with_writer(normal_writer)
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_thread_ids(false)
        .with_filter(level_filter(level));

    // -----------------------
    // Performance Logs: one line per handled event
    // -----------------------
    let perf_log_dir = format!("{}/perf", log_dir);
    fs::create_dir_all(&perf_log_dir)?;
    let (perf_writer, perf_guard) = tracing_appender::non_blocking(rolling::daily(
        perf_log_dir,
        format!("{}_perf.log", svc),
    ));

    let perf_layer = fmt::layer()
        .with_writer(perf_writer)
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_filter(Targets::new().with_target("perf", tracing::Level::INFO));

    // -----------------------
    // Cron Logs
    // -----------------------
    let cron_log_dir = format!("{}/cron", log_dir);
    fs::create_dir_all(&cron_log_dir)?;
    let (cron_writer, cron_guard) = tracing_appender::non_blocking(rolling::daily(
        cron_log_dir,
        format!("{}_cron.log", svc),
    ));

    let cron_layer = fmt::layer()
        .with_writer(cron_writer)
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_thread_ids(false)
        .with_filter(Targets::new().with_target("cron", tracing::Level::INFO));

    // -----------------------
    // Console Layer
    // -----------------------
    let console_layer = fmt::layer()
        .compact()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_thread_ids(false)
        .with_filter(level_filter(level));

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(normal_layer)
            .with(perf_layer)
            .with(cron_layer)
            .with(console_layer),
    )?;

    Ok(LogGuards {
        _normal: normal_guard,
        _perf: perf_guard,
        _cron: cron_guard,
    })
}
