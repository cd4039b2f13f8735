//! CallTally - Call History Statistics Daemon
//!
//! Runs the refresh poller and the local HTTP API until interrupted.

use calltally::monitor::{spawn_polling_thread, PollerConfig};
use calltally::store::CALL_STORE;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("calltally=info")),
        )
        .init();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║            CallTally - Call History Statistics             ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    // Initialize settings database and load persisted criteria
    println!("🔧 Initializing settings database...");
    let _ = &*calltally::store::DATABASE; // Trigger lazy init
    calltally::store::load_persisted_settings();
    println!("   ✓ Settings loaded");

    // Start HTTP server
    println!("🔧 Starting HTTP server...");
    let broadcast_tx = calltally::server::start_server();
    let _ = calltally::store::BROADCAST_TX.set(broadcast_tx);
    println!(
        "   ✓ HTTP server listening on http://127.0.0.1:{}",
        calltally::server::DEFAULT_PORT
    );

    // Shutdown signal
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        println!("\n🛑 Shutdown signal received...");
        shutdown_ctrlc.store(true, Ordering::SeqCst);
    })?;

    // Start refresh polling
    println!("🔧 Starting call log polling...");
    let calllog_path = calllog_path();
    let shutdown_poller = Arc::clone(&shutdown);
    let polling_handle =
        spawn_polling_thread(calllog_path.clone(), shutdown_poller, PollerConfig::default());
    println!("   ✓ Polling thread started ({})", calllog_path.display());

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("🎯 CallTally is running. Press Ctrl+C to quit.");
    println!();
    println!(
        "🌐 API available at http://127.0.0.1:{}",
        calltally::server::DEFAULT_PORT
    );
    println!("   • GET /api/calls     - Filtered call list");
    println!("   • GET /api/buckets   - Recency window counts");
    println!("   • GET /api/stats     - Summary statistics");
    println!("   • GET /api/config    - Filter criteria");
    println!("   • GET /api/allowlist - Number allowlist");
    println!("   • WS  /ws            - Real-time updates");
    println!("════════════════════════════════════════════════════════════════");
    println!();

    // Wait for shutdown
    while !shutdown.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(200));
    }

    // Cleanup
    println!("\n⏳ Shutting down...");
    polling_handle.join().expect("Polling thread panicked");

    print_summary();

    println!("\n👋 CallTally has exited. Goodbye!");
    Ok(())
}

/// Resolves the call-history database path.
///
/// `CALLTALLY_CALL_LOG` overrides the default location under the user
/// data directory.
fn calllog_path() -> PathBuf {
    match std::env::var("CALLTALLY_CALL_LOG") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calltally")
            .join("calllog.db"),
    }
}

fn print_summary() {
    if let Ok(store) = CALL_STORE.read() {
        println!();
        println!("════════════════════════════════════════════════════════════════");
        println!("📊 Final Summary");
        println!("════════════════════════════════════════════════════════════════");
        println!("   Raw calls:      {}", store.raw.len());
        println!("   Filtered calls: {}", store.filtered.len());

        if let Some(summary) = &store.summary {
            println!(
                "   Longest call:   {}s ({})",
                summary.longest_call.duration_secs, summary.longest_call.number
            );
            for bucket in &store.buckets {
                println!("   {:?}: {}", bucket.label, bucket.count);
            }
        }
        println!("════════════════════════════════════════════════════════════════");
    }
}
