use criterion::{black_box, criterion_group, criterion_main, Criterion};
use log::{info, LevelFilter};
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::Once;
use std::time::Instant;
use tempfile::tempdir;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use vt100_logger::appender::MessageBuffer;
use vt100_logger::format::{format_extended, format_standard};
use vt100_logger::serial::Preemptive;
use vt100_logger::{Arg, Logger, LoggerBuilder, Severity, WriterSink};

const ITERATIONS: usize = 100_000;

static LOG4RS_INIT: Once = Once::new();
static TRACING_INIT: Once = Once::new();

fn setup_log4rs(log_file: &Path) {
    LOG4RS_INIT.call_once(|| {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
            .append(true)
            .build(log_file)
            .unwrap();

        let config = Config::builder()
            .appender(Appender::builder()
                .filter(Box::new(log4rs::filter::threshold::ThresholdFilter::new(LevelFilter::Info)))
                .build("logfile", Box::new(logfile)))
            .build(Root::builder()
                .appender("logfile")
                .build(LevelFilter::Info))
            .unwrap();

        log4rs::init_config(config).unwrap();
    });
}

fn setup_tracing(dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::never(dir, "tracing.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_writer(writer.with_max_level(tracing::Level::INFO))
            .with_ansi(true)
            .without_time()
            .init();
    });
    guard
}

fn file_logger(path: &Path) -> Logger {
    let file = BufWriter::new(File::create(path).unwrap());
    LoggerBuilder::new()
        .threshold(Severity::Info)
        .sink(WriterSink::new(file))
        .serialized(Preemptive)
        .build()
}

fn file_size_mb(path: &Path) -> f64 {
    fs::metadata(path).map(|m| m.len() as f64 / (1024.0 * 1024.0)).unwrap_or(0.0)
}

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("Formatting");
    let args = [Arg::Str(Some("pump")), Arg::Int(-87), Arg::Uint(0xBEEF)];

    group.bench_function("standard_path", |b| {
        b.iter(|| {
            let mut msg = MessageBuffer::<256>::new();
            msg.fill_with(|out| format_standard(out, black_box("sensor=%s temp=%d reg=0x%X"), &args));
            black_box(msg.len())
        })
    });

    group.bench_function("interpreter_path", |b| {
        b.iter(|| {
            let mut msg = MessageBuffer::<256>::new();
            msg.fill_with(|out| format_extended(out, black_box("sensor=%s temp=%d reg=0x%X"), &args));
            black_box(msg.len())
        })
    });

    group.finish();
}

fn bench_logging_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Logging Comparison");
    group.sample_size(10); // Fewer samples due to I/O operations

    // log4rs and tracing are process-wide, so their files outlive one iteration
    let shared_dir = tempdir().unwrap();
    let log4rs_path = shared_dir.path().join("log4rs.log");
    setup_log4rs(&log4rs_path);
    let _tracing_guard = setup_tracing(shared_dir.path());

    group.bench_function("vt100_vs_traditional", |b| {
        b.iter(|| {
            let dir = tempdir().unwrap();
            let vt100_path = dir.path().join("vt100.log");

            // VT100 logger writing colorized lines to a file
            let logger = file_logger(&vt100_path);
            let vt100_start = Instant::now();
            for i in 0..ITERATIONS {
                let args = [Arg::Uint(i as u32), Arg::Uint(i as u32), Arg::Str(Some("pump"))];
                logger.write(Severity::Info, "Test perf: iteration=%u bits=%b name=%s", &args);
            }
            logger.flush();
            let vt100_duration = vt100_start.elapsed();

            // Same message volume through log4rs
            let traditional_start = Instant::now();
            for i in 0..ITERATIONS {
                info!("Test perf: iteration={} bits={:b} name={}", i, i, "pump");
            }
            let traditional_duration = traditional_start.elapsed();

            // And through tracing's non-blocking file appender
            let tracing_start = Instant::now();
            for i in 0..ITERATIONS {
                tracing::info!("Test perf: iteration={} bits={:b} name={}", i, i, "pump");
            }
            let tracing_duration = tracing_start.elapsed();

            println!("\nPerformance comparison ({} iterations):", ITERATIONS);
            println!("VT100 logging: {:.3}ms", vt100_duration.as_secs_f64() * 1000.0);
            println!("Traditional logging: {:.3}ms", traditional_duration.as_secs_f64() * 1000.0);
            println!("Tracing logging: {:.3}ms", tracing_duration.as_secs_f64() * 1000.0);
            println!("Speedup: {:.2}x", traditional_duration.as_secs_f64() / vt100_duration.as_secs_f64());
            println!("VT100 log size: {:.3} MB", file_size_mb(&vt100_path));
            println!("Traditional log size: {:.3} MB", file_size_mb(&log4rs_path));

            black_box((vt100_duration, traditional_duration, tracing_duration))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_formatting, bench_logging_comparison);
criterion_main!(benches);
