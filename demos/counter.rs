//! Counter Example - a stateful component driven by clicks
//!
//! This example demonstrates the full cycle:
//! - Component with `use_state`, `use_effect` and `use_ref`
//! - Event binding through an `onClick` prop
//! - Time-sliced rendering with a frame budget
//! - Painting the host tree to the terminal
//!
//! Run with: cargo run --example counter
//! Logs:     SPARK_FIBER_LOG=spark_fiber=debug cargo run --example counter

use std::error::Error;
use std::io;

use spark_fiber::{
    component, element, logging, renderer::terminal, Engine, EngineConfig, FrameBudget,
    HostEvent, HostTree, Hooks, Node, Props,
};

fn counter(props: &Props, hooks: &mut Hooks<'_>) -> Node {
    let label = props.get_str("label").unwrap_or("Count").to_string();
    let (count, set_count) = hooks.use_state(0_i64);
    let renders = hooks.use_ref(0_u32);
    renders.with_mut(|n| *n += 1);

    hooks.use_effect(
        move || tracing::info!(count, "count committed"),
        Some(count),
    );

    element("div")
        .child(
            element("h1")
                .prop("bold", true)
                .on("onClick", move |_| set_count.update(|c| c + 1))
                .child(format!("{label}: {count}")),
        )
        .child(element("p").prop("dim", true).child(format!("renders: {}", renders.get())))
        .build()
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init_tracing();

    let config = EngineConfig::default();
    let mut host = HostTree::from_config(&config)?;
    let container = host.create_container();
    let mut engine = Engine::with_config(host, config)?;
    let mut frames = FrameBudget::frame();

    engine.render(
        component(counter, Props::new().with("label", "Clicks")),
        container,
    );
    engine.run_until_idle(&mut frames)?;

    let mut stdout = io::stdout();
    terminal::paint(engine.host(), container, &mut stdout)?;

    for _ in 0..3 {
        let heading = engine
            .host()
            .find_element(container, "h1")
            .ok_or("counter heading was not rendered")?;
        engine.host().dispatch(heading, &HostEvent::new("click"));

        let summary = engine.run_until_idle(&mut frames)?;
        let calls = engine.host_mut().take_calls();
        tracing::debug!(?summary, host_calls = calls.len(), "click handled");
        terminal::paint(engine.host(), container, &mut stdout)?;
    }

    Ok(())
}
