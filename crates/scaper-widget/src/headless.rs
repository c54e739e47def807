//! Headless reference engine
//!
//! Keeps a scene's plots, selection, layout and options in memory without
//! drawing anything. Used by the `scaper` binary to check specifications
//! and by tests as a stand-in for a browser engine.
//!
//! Messages understood by [`HeadlessScene::handle_message`]:
//!
//! | type              | target    | payload                              |
//! |-------------------|-----------|--------------------------------------|
//! | `add-plot`        | -         | a plot spec                          |
//! | `remove-plot`     | plot id   | -                                    |
//! | `select`          | plot id?  | `{ "rows": [..], "mode": "replace" \| "add" }` |
//! | `clear-selection` | plot id?  | -                                    |
//! | `set-layout`      | -         | layout descriptor                    |

use std::collections::BTreeSet;
use std::sync::Arc;

use scaper_core::{
    resolve, ChannelValues, Container, ContainerId, Engine, EngineError, Message, PlotId,
    Projection, Scene, SceneId,
};
use scaper_data::TypedColumnSet;
use scaper_plots::{PlotKind, PlotSpec};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// Engine producing [`HeadlessScene`]s
#[derive(Debug, Clone, Default)]
pub struct HeadlessEngine;

impl HeadlessEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for HeadlessEngine {
    fn name(&self) -> &str {
        "headless"
    }

    fn create_scene(
        &self,
        container: &Container,
        data: Arc<TypedColumnSet>,
        options: Option<&Value>,
    ) -> Result<Box<dyn Scene>, EngineError> {
        if let Some(options) = options {
            if !options.is_object() {
                return Err(EngineError::InvalidPayload(
                    "scene options must be an object".to_string(),
                ));
            }
        }

        Ok(Box::new(HeadlessScene::new(
            data,
            options.cloned(),
            (container.width, container.height),
        )))
    }
}

struct HeadlessPlot {
    id: PlotId,
    kind: PlotKind,
    projection: Projection,
    options: Option<Value>,
}

/// In-memory scene
pub struct HeadlessScene {
    id: SceneId,
    data: Arc<TypedColumnSet>,
    options: Option<Value>,
    layout: Option<Value>,
    plots: Vec<HeadlessPlot>,
    next_plot: usize,
    selection: BTreeSet<usize>,
    attached: Option<ContainerId>,
    size: (f32, f32),
}

#[derive(Deserialize)]
struct SelectPayload {
    rows: Vec<usize>,
    #[serde(default)]
    mode: SelectMode,
}

#[derive(Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
enum SelectMode {
    #[default]
    Replace,
    Add,
}

impl HeadlessScene {
    fn new(data: Arc<TypedColumnSet>, options: Option<Value>, size: (f32, f32)) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            options,
            layout: None,
            plots: Vec::new(),
            next_plot: 1,
            selection: BTreeSet::new(),
            attached: None,
            size,
        }
    }

    pub fn data(&self) -> &TypedColumnSet {
        &self.data
    }

    /// Selected rows, ascending
    pub fn selection(&self) -> Vec<usize> {
        self.selection.iter().copied().collect()
    }

    pub fn plot_kinds(&self) -> Vec<PlotKind> {
        self.plots.iter().map(|plot| plot.kind).collect()
    }

    pub fn layout(&self) -> Option<&Value> {
        self.layout.as_ref()
    }

    pub fn options(&self) -> Option<&Value> {
        self.options.as_ref()
    }

    pub fn container(&self) -> Option<&ContainerId> {
        self.attached.as_ref()
    }

    pub fn size(&self) -> (f32, f32) {
        self.size
    }

    /// Channel values plot `plot` draws for row `row`
    pub fn project(&self, plot: &PlotId, row: usize) -> Option<ChannelValues> {
        let plot = self.plots.iter().find(|p| &p.id == plot)?;
        let record = self.data.record(row)?;
        Some(plot.projection.apply(&record))
    }

    fn plot_exists(&self, target: &str) -> bool {
        self.plots.iter().any(|plot| plot.id.as_str() == target)
    }

    fn require_plot(&self, target: Option<&str>) -> Result<(), EngineError> {
        match target {
            Some(target) if !self.plot_exists(target) => {
                Err(EngineError::StaleMessageTarget(target.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn select(&mut self, message: &Message) -> Result<(), EngineError> {
        self.require_plot(message.target.as_deref())?;
        let payload: SelectPayload = serde_json::from_value(message.payload.clone())
            .map_err(|e| EngineError::InvalidPayload(format!("select: {}", e)))?;

        let rows = self.data.num_rows();
        if let Some(row) = payload.rows.iter().find(|&&row| row >= rows) {
            return Err(EngineError::InvalidPayload(format!(
                "select: row {} out of bounds ({} rows)",
                row, rows
            )));
        }

        if payload.mode == SelectMode::Replace {
            self.selection.clear();
        }
        self.selection.extend(payload.rows);
        Ok(())
    }
}

impl Scene for HeadlessScene {
    fn id(&self) -> SceneId {
        self.id
    }

    fn add_plot(
        &mut self,
        kind: &str,
        projection: Projection,
        options: Option<&Value>,
    ) -> Result<PlotId, EngineError> {
        let kind: PlotKind = kind.parse()?;
        let id = PlotId::new(format!("plot-{}", self.next_plot));
        self.next_plot += 1;

        self.plots.push(HeadlessPlot {
            id: id.clone(),
            kind,
            projection,
            options: options.cloned(),
        });
        Ok(id)
    }

    fn plot_ids(&self) -> Vec<PlotId> {
        self.plots.iter().map(|plot| plot.id.clone()).collect()
    }

    fn set_layout(&mut self, layout: &Value) -> Result<(), EngineError> {
        if !(layout.is_object() || layout.is_array()) {
            return Err(EngineError::InvalidPayload(
                "layout must be an object or an array".to_string(),
            ));
        }
        self.layout = Some(layout.clone());
        Ok(())
    }

    fn handle_message(&mut self, message: &Message) -> Result<(), EngineError> {
        match message.kind.as_str() {
            "add-plot" => {
                let spec: PlotSpec = serde_json::from_value(message.payload.clone())
                    .map_err(|e| EngineError::InvalidPayload(format!("add-plot: {}", e)))?;
                self.add_plot(&spec.kind, resolve(&spec.encoding), spec.options.as_ref())
                    .map(|_| ())
            }
            "remove-plot" => {
                let target = message.target.as_deref().ok_or_else(|| {
                    EngineError::InvalidPayload("remove-plot needs a target".to_string())
                })?;
                self.require_plot(Some(target))?;
                self.plots.retain(|plot| plot.id.as_str() != target);
                Ok(())
            }
            "select" => self.select(message),
            "clear-selection" => {
                self.require_plot(message.target.as_deref())?;
                self.selection.clear();
                Ok(())
            }
            "set-layout" => self.set_layout(&message.payload),
            other => Err(EngineError::UnknownMessage(other.to_string())),
        }
    }

    fn attach(&mut self, container: &Container) -> Result<(), EngineError> {
        self.attached = Some(container.id.clone());
        self.size = (container.width, container.height);
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = None;
    }

    fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.size = (width, height);
    }

    fn snapshot(&self) -> Value {
        let plots: Vec<Value> = self
            .plots
            .iter()
            .map(|plot| {
                json!({
                    "id": plot.id,
                    "type": plot.kind.name(),
                    "encoding": plot.projection.encoding(),
                    "options": plot.options,
                })
            })
            .collect();

        json!({
            "rows": self.data.num_rows(),
            "columns": self.data.column_names().collect::<Vec<_>>(),
            "plots": plots,
            "selection": self.selection(),
            "layout": self.layout,
            "options": self.options,
            "container": self.attached,
            "size": [self.size.0, self.size.1],
        })
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
