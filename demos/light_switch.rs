//! Light Switch State Machine
//!
//! This example demonstrates a two-state machine with lifecycle hooks.
//!
//! Key concepts:
//! - Static actions naming the next state
//! - `_enter` / `_exit` hooks receiving transition metadata
//! - Wildcard fallback for events shared by every state
//! - Missing events logged as warnings, never errors
//!
//! Run with: cargo run --example light_switch

use switchboard::{args, state_enum, ActionTable, MachineBuilder, Outcome};

state_enum! {
    enum Light {
        Off,
        On,
        Broken,
    }
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== Light Switch State Machine ===\n");

    let machine = MachineBuilder::<Light>::new()
        .initial(Light::Off)
        .state(
            Light::Off,
            ActionTable::new()
                .on("toggle", Light::On)
                .on_enter(|meta| println!("  [enter Off] from {:?}", meta.from))
                .on_exit(|meta| println!("  [exit Off] via {:?} args={:?}", meta.event, meta.args)),
        )
        .state(
            Light::On,
            ActionTable::new()
                .on("toggle", Light::Off)
                .on_enter(|meta| println!("  [enter On] from {:?}", meta.from))
                .on_exit(|meta| println!("  [exit On] via {:?}", meta.event)),
        )
        .state(
            Light::Broken,
            ActionTable::new().on_fn("repair", |_, args| {
                match args.first().and_then(|v| v.as_bool()) {
                    Some(true) => Outcome::goto(Light::Off),
                    _ => Outcome::Unit,
                }
            }),
        )
        .wildcard(ActionTable::new().on("smash", Light::Broken))
        .build()
        .unwrap();

    println!("Initial state: {:?}\n", machine.current());

    let toggle = machine.event("toggle");
    println!("toggle(\"kitchen\"):");
    println!("  -> {:?}\n", toggle.call(args!["kitchen"]).unwrap());

    println!("toggle():");
    println!("  -> {:?}\n", toggle.call(args![]).unwrap());

    println!("dim() (no action defined, logs a warning):");
    println!("  -> {:?}\n", machine.invoke("dim", args![]));

    println!("smash() (wildcard fallback):");
    println!("  -> {:?}\n", machine.invoke("smash", args![]));

    println!("repair(false):");
    println!("  -> {:?}", machine.invoke("repair", args![false]));
    println!("repair(true):");
    println!("  -> {:?}\n", machine.invoke("repair", args![true]));

    println!("History path: {:?}", machine.history().get_path());

    println!("\n=== Example Complete ===");
}
