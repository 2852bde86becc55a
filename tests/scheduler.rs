mod common;

use std::time::Duration;

use spark_fiber::{
    component, element, text, Deadline, EngineConfig, FrameBudget, Hooks, Node, Props,
    SliceStatus, TimeSliceProvider, Unbounded, UnitBudget,
};

use common::{mount, mount_with, setter, setter_slot, SetterSlot};

fn app(slot: SetterSlot<i32>) -> Node {
    component(
        move |_: &Props, hooks: &mut Hooks<'_>| {
            let (count, set_count) = hooks.use_state(0);
            *slot.borrow_mut() = Some(set_count);
            element("div")
                .child(element("h1").child(format!("count {count}")))
                .child(element("p").child("one"))
                .child(element("p").child("two"))
                .build()
        },
        Props::new(),
    )
}

/// Provider that counts how many slices were requested.
#[derive(Default)]
struct CountingProvider {
    requested: usize,
}

impl TimeSliceProvider for CountingProvider {
    type Deadline = Unbounded;

    fn next_slice(&mut self) -> Unbounded {
        self.requested += 1;
        Unbounded
    }
}

#[test]
fn test_update_mid_pass_restarts_from_current() {
    let (mut engine, container) = mount();
    let slot = setter_slot();
    engine.render(app(slot.clone()), container);
    engine.flush_sync().unwrap();
    assert_eq!(engine.host().text_content(container), "count 0onetwo");

    let mut provider = UnitBudget::new(3);
    setter(&slot).update(|c| c + 1);

    let first = engine.work_loop(&provider.next_slice()).unwrap();
    assert_eq!(first.status, SliceStatus::Yielded);
    let in_flight = engine.work_in_progress().unwrap().generation();
    assert_eq!(in_flight, 2);

    // Arrives while generation 2 is half built.
    setter(&slot).update(|c| c + 1);
    let second = engine.work_loop(&provider.next_slice()).unwrap();
    assert_eq!(second.units, 3);
    assert_eq!(engine.work_in_progress().unwrap().generation(), 3);

    let summary = engine.run_until_idle(&mut provider).unwrap();
    assert_eq!(summary.commits, 1);
    assert_eq!(engine.current().unwrap().generation(), 3);
    assert_eq!(engine.host().text_content(container), "count 2onetwo");
}

#[test]
fn test_update_before_first_commit_waits_for_it() {
    let (mut engine, container) = mount();
    let slot = setter_slot();
    engine.render(app(slot.clone()), container);

    // root, then the component: the setter now exists but nothing is committed.
    let mut provider = UnitBudget::new(2);
    engine.work_loop(&provider.next_slice()).unwrap();
    assert!(engine.current().is_none());
    setter(&slot).update(|c| c + 10);

    let mut first_commit = None;
    while first_commit.is_none() {
        let outcome = engine.work_loop(&provider.next_slice()).unwrap();
        first_commit = outcome.commit.map(|report| (report, outcome.status));
    }
    let (report, status) = first_commit.unwrap();
    assert_eq!(report.generation, 1);
    assert_eq!(status, SliceStatus::Yielded);
    assert!(engine.has_pending_update());
    assert_eq!(engine.host().text_content(container), "count 0onetwo");

    engine.run_until_idle(&mut provider).unwrap();
    assert_eq!(engine.host().text_content(container), "count 10onetwo");
}

#[test]
fn test_render_clears_pending_update() {
    let (mut engine, container) = mount();
    let slot = setter_slot();
    engine.render(app(slot.clone()), container);
    engine.flush_sync().unwrap();

    setter(&slot).update(|c| c + 1);
    engine.render(app(slot.clone()), container);
    assert!(!engine.has_pending_update());

    let summary = engine.flush_sync().unwrap();
    assert_eq!(summary.commits, 1);
    // The explicit render still picked up the queued action.
    assert_eq!(engine.host().text_content(container), "count 1onetwo");
}

#[test]
fn test_discarded_pass_leaves_no_deletions() {
    let (mut engine, container) = mount();
    let tree = |items: &[&str]| {
        element("ul")
            .children(items.iter().map(|item| element("li").child(*item)))
            .build()
    };
    engine.render(tree(&["a", "b"]), container);
    engine.flush_sync().unwrap();

    engine.render(tree(&["a"]), container);
    engine.work_loop(&UnitBudget::new(2).next_slice()).unwrap();
    assert_eq!(engine.deletions().len(), 1);

    // Superseded before it could commit.
    engine.render(tree(&["a", "b"]), container);
    assert!(engine.deletions().is_empty());
    engine.flush_sync().unwrap();

    assert_eq!(engine.last_commit().unwrap().deletions, 0);
    assert_eq!(engine.host().text_content(container), "ab");
}

#[test]
fn test_provider_is_asked_every_slice() {
    let (mut engine, container) = mount();
    let mut provider = CountingProvider::default();

    engine.run_slices(&mut provider, 4).unwrap();
    assert_eq!(provider.requested, 4);

    engine.render(text("late"), container);
    let summary = engine.run_slices(&mut provider, 2).unwrap();
    assert_eq!(provider.requested, 6);
    assert_eq!(summary.commits, 1);
    assert_eq!(engine.host().text_content(container), "late");
}

#[test]
fn test_frame_budget_finishes() {
    let (mut engine, container) = mount();
    engine.render(element("div").children(["a", "b", "c"]).build(), container);

    let summary = engine.run_until_idle(&mut FrameBudget::frame()).unwrap();
    assert_eq!(summary.commits, 1);
    assert!(summary.slices >= 1);
    assert_eq!(engine.host().text_content(container), "abc");
}

#[test]
fn test_yield_threshold_from_config() {
    struct Fixed(Duration);
    impl Deadline for Fixed {
        fn time_remaining(&self) -> Duration {
            self.0
        }
    }

    let config = EngineConfig::default().with_yield_threshold(Duration::from_millis(5));
    let (mut engine, container) = mount_with(config);
    engine.render(element("div").child("a").build(), container);

    // 3 ms left is below the 5 ms threshold: one unit, then yield.
    let outcome = engine.work_loop(&Fixed(Duration::from_millis(3))).unwrap();
    assert_eq!(outcome.units, 1);
    assert_eq!(outcome.status, SliceStatus::Yielded);

    let outcome = engine.work_loop(&Fixed(Duration::from_millis(10))).unwrap();
    assert_eq!(outcome.units, 2);
    assert_eq!(outcome.status, SliceStatus::Idle);
}
