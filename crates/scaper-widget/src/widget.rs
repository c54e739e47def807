//! Scene lifecycle for one widget instance

use std::sync::Arc;

use parking_lot::Mutex;
use scaper_core::events::events::{RenderFailed, SceneMounted, SceneReleased};
use scaper_core::{
    BridgeSettings, Container, Engine, EngineError, EventBus, LiveRegistry, Scene, SceneHandle,
    SceneId,
};
use scaper_data::coerce;
use scaper_plots::{translate, TranslateReport};

use crate::error::BridgeError;
use crate::replay::{replay, ReplayReport};
use crate::spec::{SpecShape, Specification};

/// Outcome of a successful render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub scene_id: SceneId,
    pub shape: SpecShape,
    pub rows: usize,
    pub columns: usize,
    pub plots: TranslateReport,
    /// Present when a queue was replayed
    pub replay: Option<ReplayReport>,
    /// Set when the scene refused the layout
    pub layout_error: Option<EngineError>,
}

struct MountedScene {
    id: SceneId,
    handle: SceneHandle,
}

/// A widget bound to one container.
///
/// Holds at most one live scene. Rendering builds the new scene completely
/// before the old one is released, so a failed render leaves the previous
/// scene in place.
pub struct Widget {
    engine: Arc<dyn Engine>,
    container: Container,
    registry: Arc<LiveRegistry>,
    events: Arc<EventBus>,
    settings: BridgeSettings,
    scene: Option<MountedScene>,
}

impl Widget {
    /// Create a widget for `container`, publishing to the process-wide registry
    pub fn new(engine: Arc<dyn Engine>, container: Container) -> Self {
        Self {
            engine,
            container,
            registry: LiveRegistry::global(),
            events: Arc::new(EventBus::new()),
            settings: BridgeSettings::default(),
            scene: None,
        }
    }

    pub fn with_registry(mut self, registry: Arc<LiveRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn with_settings(mut self, settings: BridgeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// The live scene, if one is mounted
    pub fn scene(&self) -> Option<SceneHandle> {
        self.scene.as_ref().map(|mounted| mounted.handle.clone())
    }

    pub fn scene_id(&self) -> Option<SceneId> {
        self.scene.as_ref().map(|mounted| mounted.id)
    }

    /// Parse a JSON payload and render it
    pub fn render_json(&mut self, json: &str) -> Result<RenderReport, BridgeError> {
        let spec = Specification::from_json_str(json)?;
        self.render_value(&spec)
    }

    /// Render a specification into this widget's container
    pub fn render_value(&mut self, spec: &Specification) -> Result<RenderReport, BridgeError> {
        if self.settings.log_spec {
            tracing::debug!("Render payload for '{}': {:?}", self.container.id, spec);
        }
        if let Some(message) = &spec.message {
            tracing::info!("Widget '{}': {}", self.container.id, message);
        }

        let result = self.build(spec).and_then(|(scene, report)| {
            self.release();
            self.mount(scene, &report).map(|()| report)
        });

        match result {
            Ok(report) => Ok(report),
            Err(error) => {
                tracing::error!("Render into '{}' failed: {}", self.container.id, error);
                self.events.publish(RenderFailed {
                    container: self.container.id.clone(),
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Record the new container size and pass it on to the live scene
    pub fn resize(&mut self, width: f32, height: f32) {
        self.container.width = width;
        self.container.height = height;
        if let Some(mounted) = &self.scene {
            tracing::debug!("Resizing '{}' to {}x{}", self.container.id, width, height);
            mounted.handle.lock().resize(width, height);
        }
    }

    /// Detach the live scene and remove it from the registry
    pub fn unmount(&mut self) {
        self.release();
    }

    /// Build and populate a scene without touching the container
    fn build(&self, spec: &Specification) -> Result<(Box<dyn Scene>, RenderReport), BridgeError> {
        let data = Arc::new(coerce(&spec.data, &spec.types, &self.settings.null_config)?);
        let (rows, columns) = (data.num_rows(), data.num_columns());

        let mut scene = self
            .engine
            .create_scene(&self.container, data, spec.options.as_ref())?;

        let plots = translate(scene.as_mut(), spec.plots());

        let replay = match &spec.queue {
            Some(queue) if self.settings.replay_queue => Some(replay(scene.as_mut(), queue)),
            Some(queue) => {
                tracing::debug!("Ignoring queue of {} messages", queue.len());
                None
            }
            None => None,
        };

        let mut layout_error = None;
        if let Some(layout) = &spec.layout {
            if let Err(error) = scene.set_layout(layout) {
                tracing::warn!("Layout not applied to '{}': {}", self.container.id, error);
                layout_error = Some(error);
            }
        }

        let report = RenderReport {
            scene_id: scene.id(),
            shape: spec.shape(),
            rows,
            columns,
            plots,
            replay,
            layout_error,
        };
        Ok((scene, report))
    }

    /// Attach a built scene and claim the container for it
    fn mount(&mut self, mut scene: Box<dyn Scene>, report: &RenderReport) -> Result<(), BridgeError> {
        self.evict_foreign();
        scene.attach(&self.container)?;

        let id = scene.id();
        let plot_count = scene.plot_ids().len();
        let handle: SceneHandle = Arc::new(Mutex::new(scene));

        if let Err(error) = self.registry.claim(
            self.container.id.clone(),
            id,
            handle.clone(),
            self.settings.publish,
        ) {
            tracing::warn!("Could not register scene {}: {}", id, error);
        }
        self.scene = Some(MountedScene { id, handle });

        tracing::info!(
            "Mounted scene {} in '{}' ({} rows, {} plots, {:?})",
            id,
            self.container.id,
            report.rows,
            plot_count,
            report.shape
        );
        self.events.publish(SceneMounted {
            container: self.container.id.clone(),
            scene_id: id,
            plot_count,
        });
        Ok(())
    }

    /// Detach a scene another widget left in this container
    fn evict_foreign(&self) {
        if let Some(stale) = self.registry.remove(&self.container.id) {
            tracing::warn!(
                "Releasing scene left in '{}' by another widget",
                self.container.id
            );
            stale.lock().detach();
        }
    }

    fn release(&mut self) {
        let Some(mounted) = self.scene.take() else {
            return;
        };

        mounted.handle.lock().detach();
        self.registry.remove_scene(&self.container.id, mounted.id);

        tracing::info!("Released scene {} from '{}'", mounted.id, self.container.id);
        self.events.publish(SceneReleased {
            container: self.container.id.clone(),
            scene_id: mounted.id,
        });
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        self.release();
    }
}
