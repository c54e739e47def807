//! Plot spec translation
//!
//! Adds one plot per spec to a scene, in input order. Each plot stands on
//! its own: a rejected spec is logged and reported, and the rest still get
//! added.

use scaper_core::{resolve, EngineError, PlotId, Scene};

use crate::spec::PlotSpec;

/// A plot spec the scene did not accept
#[derive(Debug, Clone, PartialEq)]
pub struct PlotFailure {
    /// Position of the spec in the input
    pub index: usize,
    pub kind: String,
    pub error: EngineError,
}

/// Outcome of translating a batch of plot specs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateReport {
    /// Ids of the plots added, in input order
    pub added: Vec<PlotId>,
    pub failures: Vec<PlotFailure>,
}

impl TranslateReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Add a plot to `scene` for every spec in `specs`
pub fn translate<S: Scene + ?Sized>(scene: &mut S, specs: &[PlotSpec]) -> TranslateReport {
    let mut report = TranslateReport::default();

    for (index, spec) in specs.iter().enumerate() {
        let projection = resolve(&spec.encoding);

        match scene.add_plot(&spec.kind, projection, spec.options.as_ref()) {
            Ok(id) => {
                tracing::debug!("Added {} plot '{}' at position {}", spec.kind, id, index);
                report.added.push(id);
            }
            Err(error) => {
                match &error {
                    EngineError::UnsupportedPlotType(kind) => {
                        tracing::warn!("Skipping plot {}: unsupported plot type '{}'", index, kind);
                    }
                    other => {
                        tracing::warn!("Skipping {} plot {}: {}", spec.kind, index, other);
                    }
                }
                report.failures.push(PlotFailure {
                    index,
                    kind: spec.kind.clone(),
                    error,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::PlotKind;
    use scaper_core::{Container, Encoding, Message, Projection, SceneId};
    use serde_json::{json, Value};

    /// Scene that records the plots it is given
    #[derive(Default)]
    struct RecordingScene {
        plots: Vec<(PlotKind, Projection, Option<Value>)>,
    }

    impl Scene for RecordingScene {
        fn id(&self) -> SceneId {
            uuid::Uuid::nil()
        }

        fn add_plot(
            &mut self,
            kind: &str,
            projection: Projection,
            options: Option<&Value>,
        ) -> Result<PlotId, EngineError> {
            let kind: PlotKind = kind.parse()?;
            if options.and_then(|o| o.get("fail")).is_some() {
                return Err(EngineError::Other("refused".to_string()));
            }
            self.plots.push((kind, projection, options.cloned()));
            Ok(PlotId::new(format!("plot-{}", self.plots.len())))
        }

        fn plot_ids(&self) -> Vec<PlotId> {
            (1..=self.plots.len())
                .map(|n| PlotId::new(format!("plot-{}", n)))
                .collect()
        }

        fn set_layout(&mut self, _: &Value) -> Result<(), EngineError> {
            Ok(())
        }

        fn handle_message(&mut self, message: &Message) -> Result<(), EngineError> {
            Err(EngineError::UnknownMessage(message.kind.clone()))
        }

        fn attach(&mut self, _: &Container) -> Result<(), EngineError> {
            Ok(())
        }

        fn detach(&mut self) {}

        fn is_attached(&self) -> bool {
            false
        }

        fn snapshot(&self) -> Value {
            Value::Null
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn spec(kind: &str, channel: &str, field: &str) -> PlotSpec {
        PlotSpec::new(kind, Encoding::new().with(channel, field))
    }

    #[test]
    fn test_plot_order_is_preserved() {
        let mut scene = RecordingScene::default();
        let specs = vec![
            spec("bar", "x", "cyl"),
            spec("scatter", "x", "wt"),
            spec("bar", "x", "cyl"),
            spec("histogram", "value", "mpg"),
        ];

        let report = translate(&mut scene, &specs);

        assert!(report.is_complete());
        assert_eq!(report.added.len(), 4);
        let kinds: Vec<PlotKind> = scene.plots.iter().map(|(k, _, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![PlotKind::Bar, PlotKind::Scatter, PlotKind::Bar, PlotKind::Histogram]
        );
        assert_eq!(scene.plots[1].1.encoding().field("x"), Some("wt"));
    }

    #[test]
    fn test_unsupported_plot_does_not_stop_translation() {
        let mut scene = RecordingScene::default();
        let specs = vec![
            spec("scatter", "x", "a"),
            spec("pie", "value", "b"),
            spec("bar", "x", "c"),
        ];

        let report = translate(&mut scene, &specs);

        assert_eq!(report.added, vec![PlotId::new("plot-1"), PlotId::new("plot-2")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(
            report.failures[0].error,
            EngineError::UnsupportedPlotType("pie".to_string())
        );
        assert_eq!(scene.plots.len(), 2);
    }

    #[test]
    fn test_options_are_forwarded_and_errors_isolated() {
        let mut scene = RecordingScene::default();
        let specs = vec![
            spec("scatter", "x", "a").with_options(json!({ "fail": true })),
            spec("scatter", "x", "a").with_options(json!({ "ratio": 1 })),
        ];

        let report = translate(&mut scene, &specs);

        assert_eq!(report.failures[0].error, EngineError::Other("refused".to_string()));
        assert_eq!(scene.plots[0].2, Some(json!({ "ratio": 1 })));
    }

    #[test]
    fn test_spec_wire_shape() {
        let spec: PlotSpec = serde_json::from_value(json!({
            "type": "histogram",
            "encoding": { "value": "x" }
        }))
        .unwrap();

        assert_eq!(spec.kind, "histogram");
        assert_eq!(spec.encoding.field("value"), Some("x"));
        assert_eq!(spec.options, None);
    }
}
