mod common;

use spark_fiber::{
    component, element, text, EffectTag, HostCall, HostKind, Hooks, Node, PropValue, Props,
    UnitBudget, TimeSliceProvider,
};

use common::{committed_fibers, mount, position};

fn list(items: &[&str]) -> Node {
    element("ul")
        .prop("class", "items")
        .children(items.iter().map(|item| element("li").child(*item)))
        .build()
}

#[test]
fn test_idempotent_rerender() {
    let (mut engine, container) = mount();

    engine.render(list(&["a", "b", "c"]), container);
    engine.flush_sync().unwrap();
    let first = engine.last_commit().cloned().unwrap();
    assert_eq!(first.placements, 7);

    engine.host_mut().clear_calls();
    engine.render(list(&["a", "b", "c"]), container);
    engine.flush_sync().unwrap();

    let second = engine.last_commit().unwrap();
    assert!(second.is_structurally_stable());
    assert_eq!(second.updates, 7);

    let current = engine.current().unwrap();
    for id in committed_fibers(&engine) {
        assert_eq!(current[id].effect_tag(), EffectTag::Update);
    }
    // Equal props produce no host traffic at all.
    assert!(engine.host().calls().is_empty());
}

#[test]
fn test_type_change_replaces_position() {
    let (mut engine, container) = mount();

    engine.render(
        element("div").child(element("span").prop("id", "x")).child("tail").build(),
        container,
    );
    engine.flush_sync().unwrap();
    let div = engine.host().children(container)[0];
    let span = engine.host().children(div)[0];

    engine.host_mut().clear_calls();
    // Same props, different type at position 0.
    engine.render(
        element("div").child(element("em").prop("id", "x")).child("tail").build(),
        container,
    );
    engine.flush_sync().unwrap();

    let report = engine.last_commit().unwrap();
    assert_eq!(report.deletions, 1);
    assert_eq!(report.placements, 1);

    let calls = engine.host().calls();
    assert!(calls.contains(&HostCall::Detach { parent: div, child: span }));
    let em = engine.host().children(div)[1];
    assert_eq!(engine.host().node(em).unwrap().kind(), &HostKind::Element("em".into()));
    // Attach appends, so the replacement lands after the untouched sibling.
    assert_eq!(engine.host().text_content(container), "tail");
}

#[test]
fn test_nothing_reaches_the_host_before_commit() {
    let (mut engine, container) = mount();
    engine.render(list(&["a", "b"]), container);
    engine.flush_sync().unwrap();
    engine.host_mut().clear_calls();

    engine.render(list(&["b"]), container);
    let mut provider = UnitBudget::new(1);
    while engine.next_unit_of_work().is_some() {
        let before = engine.host().calls().len();
        let outcome = engine.work_loop(&provider.next_slice()).unwrap();
        if outcome.commit.is_none() {
            assert_eq!(engine.host().calls().len(), before);
            assert!(engine.host().calls().iter().all(|call| !call.is_structural()));
        }
    }

    let calls = engine.host().calls();
    let last_detach = calls
        .iter()
        .rposition(|call| matches!(call, HostCall::Detach { .. }))
        .unwrap();
    let first_other = position(calls, |call| {
        !matches!(call, HostCall::Detach { .. } | HostCall::Create { .. })
    });
    assert!(first_other.is_none_or(|index| index > last_detach));
    assert_eq!(engine.host().text_content(container), "b");
}

fn wrapper(props: &Props, _hooks: &mut Hooks<'_>) -> Node {
    let label = props.get_str("label").unwrap_or_default().to_string();
    element("section").child(element("b").child(label)).build()
}

#[test]
fn test_component_subtree_detaches_at_host_root() {
    let (mut engine, container) = mount();
    engine.render(
        element("div")
            .child(component(wrapper, Props::new().with("label", "inner")))
            .build(),
        container,
    );
    engine.flush_sync().unwrap();
    let div = engine.host().children(container)[0];
    let section = engine.host().children(div)[0];

    engine.host_mut().clear_calls();
    engine.render(element("div").child(text("plain")).build(), container);
    engine.flush_sync().unwrap();

    let detaches: Vec<_> = engine
        .host()
        .calls()
        .iter()
        .filter(|call| matches!(call, HostCall::Detach { .. }))
        .cloned()
        .collect();
    assert_eq!(detaches, vec![HostCall::Detach { parent: div, child: section }]);
    // The text node is created during render; the detach still precedes every attach.
    let calls = engine.host().calls();
    let detach = position(calls, |call| matches!(call, HostCall::Detach { .. })).unwrap();
    let attach = position(calls, |call| matches!(call, HostCall::Attach { .. })).unwrap();
    assert!(detach < attach);
    assert_eq!(engine.host().text_content(container), "plain");
}

#[test]
fn test_div_text_end_to_end() {
    let (mut engine, container) = mount();
    let node = |value: &str| {
        element("div")
            .child(element("text").prop("value", value))
            .build()
    };

    engine.render(node("a"), container);
    engine.flush_sync().unwrap();

    let div = engine.host().children(container)[0];
    let leaf = engine.host().children(div)[0];
    assert_eq!(engine.host().children(container), &[div]);
    assert_eq!(engine.host().node(leaf).unwrap().text(), Some("a"));

    engine.host_mut().clear_calls();
    engine.render(node("b"), container);
    engine.flush_sync().unwrap();

    let report = engine.last_commit().unwrap();
    assert_eq!((report.placements, report.deletions), (0, 0));
    assert_eq!(engine.host().children(container), &[div]);
    assert_eq!(engine.host().children(div), &[leaf]);
    assert_eq!(
        engine.host().calls(),
        &[HostCall::Set {
            id: leaf,
            name: "value".into(),
            value: PropValue::from("b"),
        }]
    );
}
