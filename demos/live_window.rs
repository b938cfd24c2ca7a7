//! A simulated acquisition thread feeding a live chart.
//!
//! One producer appends a sine wave at ~1 kHz, a maintenance thread slides a
//! 2-second window, and the "renderer" on the main thread snapshots the
//! committed data a few times per second.
//!
//! Run with:
//!     RUST_LOG=cadence=debug cargo run --example live_window --release

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cadence::{BoundingRect, CadenceBuffer};
use tracing_subscriber::EnvFilter;

/// Visible time span in seconds.
const WINDOW: f64 = 2.0;
/// How long the demo runs.
const RUN_FOR: Duration = Duration::from_secs(5);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Composition root: the single buffer is built here and handed out.
    let buffer = CadenceBuffer::builder().initial_capacity(4_096).build();
    let running = Arc::new(AtomicBool::new(true));
    let epoch = Instant::now();

    let producer = {
        let buffer = buffer.clone();
        let running = Arc::clone(&running);
        thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                let t = epoch.elapsed().as_secs_f64();
                buffer.append((t, (t * std::f64::consts::TAU).sin()));
                thread::sleep(Duration::from_millis(1));
            }
        })
    };

    let maintenance = {
        let buffer = buffer.clone();
        let running = Arc::clone(&running);
        thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(250));
                let t = epoch.elapsed().as_secs_f64();
                buffer.evict_stale(t - WINDOW);
            }
        })
    };

    while epoch.elapsed() < RUN_FOR {
        thread::sleep(Duration::from_millis(200));
        let view = buffer.read();
        match view.bounding_rect() {
            BoundingRect::Invalid => println!("no data yet"),
            BoundingRect::Valid {
                left,
                top,
                right,
                bottom,
            } => println!(
                "{:5} samples  x=[{left:.3}, {right:.3}]  y=[{top:.3}, {bottom:.3}]",
                view.len()
            ),
        }
    }

    running.store(false, Ordering::Relaxed);
    producer.join().unwrap();
    maintenance.join().unwrap();

    let merged = buffer.flush();
    let stats = buffer.stats();
    println!(
        "appended={} drains={} deferred={} ({:.2}% deferred) evicted={} merged_at_exit={merged}",
        stats.appended,
        stats.drains,
        stats.deferred_drains,
        stats.deferral_rate() * 100.0,
        stats.evicted,
    );
}
