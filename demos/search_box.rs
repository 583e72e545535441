//! Debounced Search Box
//!
//! This example demonstrates per-event debouncing on a tokio runtime.
//!
//! Key concepts:
//! - A burst of keystrokes collapses into one `search` dispatch
//! - Earlier calls in the burst resolve to `Superseded`
//! - A `None` wait cancels the pending call
//! - Direct calls are never blocked by a pending timer
//!
//! Run with: cargo run --example search_box

use std::time::Duration;
use switchboard::{args, state_enum, ActionTable, InvokeError, MachineBuilder, MachineConfig};

state_enum! {
    enum Search {
        Idle,
        Searching,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    println!("=== Debounced Search Box ===\n");

    let machine = MachineBuilder::<Search>::new()
        .initial(Search::Idle)
        .state(
            Search::Idle,
            ActionTable::new()
                .on("search", Search::Searching)
                .on_exit(|meta| println!("  searching for {:?}", meta.args)),
        )
        .state(Search::Searching, ActionTable::new().on("clear", Search::Idle))
        .config(MachineConfig::default().with_default_debounce(Duration::from_millis(150)))
        .build()
        .unwrap();

    let search = machine.event("search");

    println!("Typing \"rust\" one keystroke at a time:");
    let mut pending = Vec::new();
    for prefix in ["r", "ru", "rus", "rust"] {
        pending.push((prefix, search.debounce_default(args![prefix])));
        tokio::time::sleep(Duration::from_millis(40)).await;
    }

    for (prefix, call) in pending {
        match call.await {
            Ok(state) => println!("  {:?} -> {:?}", prefix, state),
            Err(InvokeError::Superseded { .. }) => println!("  {:?} superseded", prefix),
            Err(err) => println!("  {:?} failed: {}", prefix, err),
        }
    }

    println!("\nClearing, then cancelling a pending search:");
    machine.invoke("clear", args![]);
    let abandoned = search.debounce(Duration::from_millis(100), args!["go"]);
    let cancelled = search.debounce(None, args![]).await;
    println!("  cancel resolved to {:?}", cancelled);
    println!("  abandoned call: {:?}", abandoned.await);
    println!("  current state: {:?}", machine.current());

    println!("\n=== Example Complete ===");
}
