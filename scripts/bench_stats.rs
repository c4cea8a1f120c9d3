use std::env;
use std::io::{self, Write};
use std::process::Command;
use std::time::Instant;

/// A figure printed by the comparison benchmark, identified by its label.
struct Metric {
    title: &'static str,
    prefix: &'static str,
    suffix: &'static str,
    samples: Vec<f64>,
}

impl Metric {
    fn new(title: &'static str, prefix: &'static str, suffix: &'static str) -> Self {
        Self {
            title,
            prefix,
            suffix,
            samples: Vec::new(),
        }
    }

    fn record(&mut self, output: &str) -> Option<f64> {
        let value = parse_value(output, self.prefix, self.suffix)?;
        self.samples.push(value);
        Some(value)
    }
}

fn main() -> io::Result<()> {
    let num_runs = env::args()
        .nth(1)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10);

    println!("Running logging comparison {} times...", num_runs);

    let mut vt100 = Metric::new("VT100 Logging Time (ms)", "VT100 logging: ", "ms");
    let mut traditional = Metric::new("log4rs Logging Time (ms)", "Traditional logging: ", "ms");
    let mut tracing = Metric::new("tracing Logging Time (ms)", "Tracing logging: ", "ms");
    let mut vt100_size = Metric::new("VT100 Log Size (MB)", "VT100 log size: ", " MB");
    let mut speedups = Vec::with_capacity(num_runs);
    let mut completed = 0;

    let start_time = Instant::now();

    for i in 1..=num_runs {
        print!("Run {}/{}... ", i, num_runs);
        io::stdout().flush()?;

        let output = Command::new("cargo")
            .args(["bench", "--bench", "perf_tests", "--", "Logging Comparison"])
            .output()?;

        if !output.status.success() {
            eprintln!("Benchmark failed on run {}", i);
            continue;
        }
        completed += 1;

        let output_str = String::from_utf8_lossy(&output.stdout);
        let vt100_ms = vt100.record(&output_str);
        let traditional_ms = traditional.record(&output_str);
        tracing.record(&output_str);
        vt100_size.record(&output_str);

        match (vt100_ms, traditional_ms) {
            (Some(fast), Some(slow)) if fast > 0.0 => {
                let speedup = slow / fast;
                speedups.push(speedup);
                println!("Speedup: {:.2}x", speedup);
            }
            _ => println!("no timing found"),
        }
    }

    println!("\nCompleted {} runs in {:.2?}", completed, start_time.elapsed());
    println!("\n===== PERFORMANCE SUMMARY =====");

    for metric in [&vt100, &traditional, &tracing, &vt100_size] {
        if let Some(stats) = calculate_stats(&metric.samples) {
            println!("\n{}:", metric.title);
            print_stats(&stats);
        }
    }

    if let Some(stats) = calculate_stats(&speedups) {
        println!("\nSpeedup (log4rs/VT100):");
        print_stats(&stats);
    }

    Ok(())
}

fn parse_value(text: &str, prefix: &str, suffix: &str) -> Option<f64> {
    text.lines().find_map(|line| {
        let start = line.find(prefix)? + prefix.len();
        let end = line[start..].find(suffix)?;
        line[start..start + end].trim().parse::<f64>().ok()
    })
}

struct Stats {
    min: f64,
    max: f64,
    mean: f64,
    median: f64,
    std_dev: f64,
}

fn calculate_stats(values: &[f64]) -> Option<Stats> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / count;
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

    Some(Stats {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean,
        median,
        std_dev: variance.sqrt(),
    })
}

fn print_stats(stats: &Stats) {
    let spread = if stats.mean != 0.0 {
        stats.std_dev / stats.mean * 100.0
    } else {
        0.0
    };
    println!("  Min: {:.3}", stats.min);
    println!("  Max: {:.3}", stats.max);
    println!("  Mean: {:.3}", stats.mean);
    println!("  Median: {:.3}", stats.median);
    println!("  Std Dev: {:.3} ({:.2}% of mean)", stats.std_dev, spread);
}
