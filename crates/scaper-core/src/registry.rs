//! Live-instance registry
//!
//! Keeps every mounted scene reachable by its container id, plus a pointer
//! to the most recently mounted one, so external tooling can inspect and
//! drive live widgets. Widgets claim their container on mount and release
//! it on unmount. Hidden claims still own the container but are not listed
//! to tooling.

use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use thiserror::Error;

use crate::container::ContainerId;
use crate::engine::{SceneHandle, SceneId};

static GLOBAL: Lazy<Arc<LiveRegistry>> = Lazy::new(|| Arc::new(LiveRegistry::new()));

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Container '{0}' already holds a live scene")]
    MountConflict(ContainerId),
}

struct Entry {
    scene_id: SceneId,
    handle: SceneHandle,
    published: bool,
}

/// Table of live scenes keyed by container
pub struct LiveRegistry {
    scenes: RwLock<AHashMap<ContainerId, Entry>>,
    current: RwLock<Option<ContainerId>>,
}

impl LiveRegistry {
    pub fn new() -> Self {
        Self {
            scenes: RwLock::new(AHashMap::new()),
            current: RwLock::new(None),
        }
    }

    /// The process-wide registry
    pub fn global() -> Arc<LiveRegistry> {
        GLOBAL.clone()
    }

    /// Publish a freshly mounted scene and make it current. Fails if the
    /// container is still claimed; callers release it first.
    pub fn insert(
        &self,
        container: ContainerId,
        scene_id: SceneId,
        handle: SceneHandle,
    ) -> Result<(), RegistryError> {
        self.claim(container, scene_id, handle, true)
    }

    /// Claim `container` for a scene. Unpublished claims are invisible to
    /// lookups and never become current.
    pub fn claim(
        &self,
        container: ContainerId,
        scene_id: SceneId,
        handle: SceneHandle,
        published: bool,
    ) -> Result<(), RegistryError> {
        let mut scenes = self.scenes.write();
        if scenes.contains_key(&container) {
            return Err(RegistryError::MountConflict(container));
        }
        scenes.insert(
            container.clone(),
            Entry {
                scene_id,
                handle,
                published,
            },
        );
        drop(scenes);
        if published {
            *self.current.write() = Some(container);
        }
        Ok(())
    }

    /// Remove whatever scene `container` holds, published or not
    pub fn remove(&self, container: &ContainerId) -> Option<SceneHandle> {
        let removed = self.scenes.write().remove(container);
        if removed.is_some() {
            self.clear_current(container);
        }
        removed.map(|entry| entry.handle)
    }

    /// Scene id of the claim on `container`, published or not
    pub fn owner(&self, container: &ContainerId) -> Option<SceneId> {
        self.scenes.read().get(container).map(|entry| entry.scene_id)
    }

    /// Remove the entry for `container` only if it still belongs to
    /// `scene_id`. Returns whether an entry was removed.
    pub fn remove_scene(&self, container: &ContainerId, scene_id: SceneId) -> bool {
        let mut scenes = self.scenes.write();
        let owned = scenes
            .get(container)
            .map(|entry| entry.scene_id == scene_id)
            .unwrap_or(false);
        if owned {
            scenes.remove(container);
            drop(scenes);
            self.clear_current(container);
        }
        owned
    }

    pub fn get(&self, container: &ContainerId) -> Option<SceneHandle> {
        self.scenes
            .read()
            .get(container)
            .filter(|entry| entry.published)
            .map(|entry| entry.handle.clone())
    }

    pub fn scene_id(&self, container: &ContainerId) -> Option<SceneId> {
        self.scenes
            .read()
            .get(container)
            .filter(|entry| entry.published)
            .map(|entry| entry.scene_id)
    }

    /// The most recently mounted scene that is still live
    pub fn current(&self) -> Option<SceneHandle> {
        let container = self.current.read().clone()?;
        self.get(&container)
    }

    pub fn current_container(&self) -> Option<ContainerId> {
        self.current.read().clone()
    }

    /// Containers with a published scene, sorted
    pub fn containers(&self) -> Vec<ContainerId> {
        let mut containers: Vec<_> = self
            .scenes
            .read()
            .iter()
            .filter(|(_, entry)| entry.published)
            .map(|(container, _)| container.clone())
            .collect();
        containers.sort();
        containers
    }

    /// Number of published scenes
    pub fn len(&self) -> usize {
        self.scenes
            .read()
            .values()
            .filter(|entry| entry.published)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear_current(&self, container: &ContainerId) {
        let mut current = self.current.write();
        if current.as_ref() == Some(container) {
            *current = None;
        }
    }
}

impl Default for LiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}
