use std::sync::Arc;

use scaper_core::{Container, EngineError, LiveRegistry, Message};
use scaper_widget::{replay, HeadlessEngine, HeadlessScene, SpecShape, Specification, Widget};
use serde_json::{json, Value};

fn widget(registry: &Arc<LiveRegistry>) -> Widget {
    Widget::new(Arc::new(HeadlessEngine::new()), Container::new("el", 400.0, 400.0))
        .with_registry(registry.clone())
}

fn queue_spec(queue: Value) -> Specification {
    serde_json::from_value(json!({
        "data": { "x": [1, 2, 3, 4], "g": ["a", "b", "a", "b"] },
        "types": { "x": "number", "g": "factor" },
        "queue": queue
    }))
    .unwrap()
}

fn selection(widget: &Widget) -> Vec<usize> {
    let handle = widget.scene().unwrap();
    let guard = handle.lock();
    guard
        .as_any()
        .downcast_ref::<HeadlessScene>()
        .unwrap()
        .selection()
}

#[test]
fn test_clear_after_select_leaves_no_selection() {
    let registry = Arc::new(LiveRegistry::new());
    let mut widget = widget(&registry);

    let report = widget
        .render_value(&queue_spec(json!([
            { "type": "select", "payload": { "rows": [2] } },
            { "type": "clear-selection" }
        ])))
        .unwrap();

    assert_eq!(report.shape, SpecShape::Queue);
    let replayed = report.replay.unwrap();
    assert_eq!(replayed.applied, 2);
    assert!(selection(&widget).is_empty());
}

#[test]
fn test_messages_apply_in_recorded_order() {
    let registry = Arc::new(LiveRegistry::new());
    let mut widget = widget(&registry);

    widget
        .render_value(&queue_spec(json!([
            { "type": "clear-selection" },
            { "type": "select", "payload": { "rows": [0, 1] } },
            { "type": "select", "payload": { "rows": [3], "mode": "add" } }
        ])))
        .unwrap();

    assert_eq!(selection(&widget), vec![0, 1, 3]);
}

#[test]
fn test_stale_targets_are_skipped() {
    let registry = Arc::new(LiveRegistry::new());
    let mut widget = widget(&registry);

    let report = widget
        .render_value(&queue_spec(json!([
            { "type": "add-plot", "payload": { "type": "scatter", "encoding": { "x": "x", "y": "x" } } },
            { "type": "select", "target": "plot-7", "payload": { "rows": [1] } },
            { "type": "remove-plot", "target": "plot-1" },
            { "type": "select", "target": "plot-1", "payload": { "rows": [2] } },
            { "type": "select", "payload": { "rows": [0] } }
        ])))
        .unwrap();

    let replayed = report.replay.unwrap();
    assert_eq!(replayed.applied, 3);
    assert_eq!(replayed.skipped, 2);
    assert!(replayed.failures.is_empty());
    assert_eq!(selection(&widget), vec![0]);
}

#[test]
fn test_other_failures_are_isolated() {
    let registry = Arc::new(LiveRegistry::new());
    let mut widget = widget(&registry);

    let report = widget
        .render_value(&queue_spec(json!([
            { "type": "zoom" },
            { "type": "select", "payload": { "rows": [99] } },
            { "type": "select", "payload": { "rows": [1] } }
        ])))
        .unwrap();

    let replayed = report.replay.unwrap();
    assert_eq!(replayed.applied, 1);
    assert_eq!(replayed.failures.len(), 2);
    assert_eq!(
        replayed.failures[0].error,
        EngineError::UnknownMessage("zoom".to_string())
    );
    assert_eq!(replayed.failures[1].index, 1);
    assert_eq!(selection(&widget), vec![1]);
}

#[test]
fn test_identical_queues_produce_equivalent_scenes() {
    let queue = json!([
        { "type": "add-plot", "payload": { "type": "bar", "encoding": { "x": "g" } } },
        { "type": "add-plot", "payload": { "type": "histogram", "encoding": { "value": "x" } } },
        { "type": "select", "target": "plot-1", "payload": { "rows": [1, 3] } },
        { "type": "remove-plot", "target": "plot-2" },
        { "type": "set-layout", "payload": [[1]] }
    ]);

    let first_registry = Arc::new(LiveRegistry::new());
    let second_registry = Arc::new(LiveRegistry::new());
    let mut first = widget(&first_registry);
    let mut second = widget(&second_registry);

    first.render_value(&queue_spec(queue.clone())).unwrap();
    second.render_value(&queue_spec(queue)).unwrap();

    let a = first.scene().unwrap().lock().snapshot();
    let b = second.scene().unwrap().lock().snapshot();
    assert_eq!(a, b);
    assert_eq!(a["selection"], json!([1, 3]));
    assert_ne!(first.scene_id(), second.scene_id());
}

#[test]
fn test_plots_are_added_before_queue_replays() {
    let registry = Arc::new(LiveRegistry::new());
    let mut widget = widget(&registry);

    let spec: Specification = serde_json::from_value(json!({
        "data": { "x": [1, 2, 3] },
        "types": { "x": "number" },
        "plots": [{ "type": "histogram", "encoding": { "value": "x" } }],
        "queue": [{ "type": "select", "target": "plot-1", "payload": { "rows": [0] } }]
    }))
    .unwrap();

    let report = widget.render_value(&spec).unwrap();
    assert_eq!(report.shape, SpecShape::PlotsAndQueue);
    assert_eq!(report.replay.unwrap().applied, 1);
    assert_eq!(selection(&widget), vec![0]);
}

#[test]
fn test_queue_can_be_disabled() {
    let registry = Arc::new(LiveRegistry::new());
    let settings = scaper_core::BridgeSettings {
        replay_queue: false,
        ..Default::default()
    };
    let mut widget = widget(&registry).with_settings(settings);

    let report = widget
        .render_value(&queue_spec(json!([{ "type": "select", "payload": { "rows": [1] } }])))
        .unwrap();

    assert!(report.replay.is_none());
    assert!(selection(&widget).is_empty());
}

#[test]
fn test_replay_directly_on_a_scene() {
    let engine = HeadlessEngine::new();
    let data = Arc::new(scaper_data::TypedColumnSet::empty());
    let mut scene = scaper_core::Engine::create_scene(
        &engine,
        &Container::new("el", 1.0, 1.0),
        data,
        None,
    )
    .unwrap();

    let report = replay(
        scene.as_mut(),
        &[
            Message::new("add-plot").with_payload(json!({ "type": "note" })),
            Message::new("remove-plot").with_target("plot-1"),
            Message::new("remove-plot").with_target("plot-1"),
        ],
    );

    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 1);
    assert!(scene.plot_ids().is_empty());
}
