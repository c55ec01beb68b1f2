#![allow(non_snake_case)]
//! Renders a tiny component tree over a `SampleProvider` and feeds it the
//! JSON actions given on the command line:
//!
//! ```text
//! RUST_LOG=debug cargo run -p counter -- '{"type":"SET_COUNT","count":5}' '{"type":"TOGGLE_GOOD"}'
//! ```

use anyhow::Context;
use sample_context::prelude::*;

fn CountLabel() -> String {
    format!("Count: {}", use_sample_state().count)
}

fn Greeting() -> String {
    let state = use_sample_state();
    let mood = if state.is_good { "good" } else { "not good" };
    format!("{} [{}] ({mood})", state.text, state.color)
}

fn App() -> String {
    [CountLabel(), Greeting()].join("  |  ")
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let actions: Vec<String> = std::env::args().skip(1).collect();
    let provider = SampleProvider::new();

    provider.provide(|| -> anyhow::Result<()> {
        observe_sample_state(|state| log::info!("state changed: count={}", state.count))
            .context("observer outside provider")?;
        println!("{}", App());

        let dispatch = use_sample_dispatch();
        for (i, json) in actions.iter().enumerate() {
            dispatch
                .dispatch_json(json)
                .with_context(|| format!("action #{}", i + 1))?;
            println!("{}", App());
        }
        Ok(())
    })?;

    provider.dispose();
    Ok(())
}
