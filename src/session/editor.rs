//! Editing session: owns the scene and the user's edits, and drives the
//! evaluator once per frame.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::animation::{AnimationState, Pose, TransformEvaluator};
use crate::asset::{LoadCompletion, LoadQueue, LoadTicket, LoaderRegistry, ModelSource, ModelTree};
use crate::core::{Error, Result};
use crate::material::{MaterialSpec, apply_material};
use crate::scene::{LightingSettings, RenderItem, SceneGraph, SceneNodeId, ViewerConfig};

use super::export::{self, ConfigExport, ModelRecord, Snapshot, SnapshotFormat};
use super::notify::Notification;
use super::storage::{self, KeyValueStore};

/// Store key of the master animation flag.
pub const ANIMATIONS_KEY: &str = "enableAnimations";

/// One model being viewed and edited.
///
/// All mutation happens on the caller's thread. Loads run in the background
/// and are picked up by `frame()`.
pub struct EditorSession {
    config: ViewerConfig,
    graph: SceneGraph,
    /// Group node holding the loaded model or the placeholder
    model_root: Option<SceneNodeId>,
    /// File name of the loaded model; `None` while the placeholder is shown
    model_name: Option<String>,
    pose: Pose,
    material: MaterialSpec,
    material_dirty: bool,
    animation: AnimationState,
    lighting: LightingSettings,
    evaluator: TransformEvaluator,
    animations_enabled: bool,
    prefers_reduced_motion: bool,
    loader: Option<LoadQueue>,
    pending_source: Option<String>,
    notifications: Vec<Notification>,
    store: Box<dyn KeyValueStore>,
}

impl EditorSession {
    /// Start a session showing the placeholder. The animation flag comes from
    /// the store, or from the reduced-motion preference when the store has none.
    pub fn new(config: ViewerConfig, store: Box<dyn KeyValueStore>) -> Self {
        let animations_enabled = match storage::load_json::<bool>(store.as_ref(), ANIMATIONS_KEY) {
            Ok(Some(enabled)) => enabled,
            Ok(None) => !config.prefers_reduced_motion,
            Err(e) => {
                log::warn!("Ignoring stored animation flag: {}", e);
                !config.prefers_reduced_motion
            }
        };

        let pose = Pose::default();
        let mut session = Self {
            lighting: config.lighting,
            prefers_reduced_motion: config.prefers_reduced_motion,
            config,
            graph: SceneGraph::new(),
            model_root: None,
            model_name: None,
            pose,
            material: MaterialSpec::default(),
            material_dirty: false,
            animation: AnimationState::default(),
            evaluator: TransformEvaluator::new(&pose),
            animations_enabled,
            loader: None,
            pending_source: None,
            notifications: Vec::new(),
            store,
        };
        session.install(&ModelTree::placeholder_cube(), None);
        session
    }

    /// Attach a background loader.
    pub fn with_loader(mut self, loader: LoadQueue) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Attach a loader on the caller's tokio runtime.
    pub fn with_current_runtime(config: ViewerConfig, store: Box<dyn KeyValueStore>) -> Result<Self> {
        let registry = Arc::new(LoaderRegistry::new(config.max_upload_bytes));
        let loader = LoadQueue::with_current_runtime(registry)?;
        Ok(Self::new(config, store).with_loader(loader))
    }

    /// Advance one frame at time `t` (seconds since start).
    ///
    /// Picks up a finished load, re-applies the material if it changed, runs
    /// the evaluator on the model root, and refreshes world transforms.
    /// Returns whether the evaluator wrote the model's transform.
    pub fn frame(&mut self, t: f32) -> bool {
        if let Some(completion) = self.loader.as_mut().and_then(|q| q.poll()) {
            self.finish_load(completion);
        }

        if self.material_dirty {
            if let Some(root) = self.model_root {
                apply_material(&mut self.graph, root, &self.material);
            }
            self.material_dirty = false;
        }

        let written = match self.model_root {
            Some(root) => self.evaluator.evaluate(
                &mut self.graph,
                root,
                &self.pose,
                &self.animation,
                t,
                self.animations_enabled,
            ),
            None => false,
        };

        self.graph.update_world_transforms();
        written
    }

    /// Validate and start loading `source`. The current model stays on
    /// screen until the load completes.
    ///
    /// Only the format and the size of uploaded bytes are checked here. Files
    /// are read on the loader, so an unreadable or oversized file ends in the
    /// placeholder fallback rather than an error.
    pub fn request_load(&mut self, source: ModelSource) -> Result<LoadTicket> {
        let checked = source.format().and_then(|_| match &source {
            ModelSource::Memory { .. } => source.check_size(self.config.max_upload_bytes),
            ModelSource::File(_) => Ok(()),
        });
        if let Err(e) = checked {
            let message = match &e {
                Error::FileTooLarge { limit, .. } => {
                    format!("File size must be less than {}MB", limit / (1024 * 1024))
                }
                other => other.to_string(),
            };
            self.notify(Notification::error(message));
            return Err(e);
        }

        let loader = self.loader.as_mut().ok_or(Error::LoaderUnavailable)?;
        let ticket = loader.submit(source.clone());
        log::info!("Requested load of '{}' ({:?})", source.file_name(), ticket);
        self.pending_source = Some(source.file_name());
        Ok(ticket)
    }

    /// Wait for the current load and install its result.
    /// Returns `false` when nothing was pending.
    pub async fn wait_for_load(&mut self) -> bool {
        let Some(loader) = self.loader.as_mut() else {
            return false;
        };
        let completion = loader.next_completed().await;
        match completion {
            Some(completion) => {
                self.finish_load(completion);
                true
            }
            None => false,
        }
    }

    fn finish_load(&mut self, completion: LoadCompletion) {
        self.pending_source = None;
        match completion.result {
            Ok(tree) => {
                log::info!(
                    "Installed '{}' in {:.1}ms",
                    completion.source_name,
                    completion.load_time.as_secs_f64() * 1000.0
                );
                self.install(&tree, Some(completion.source_name.clone()));
                self.notify(Notification::success(format!(
                    "Model '{}' loaded",
                    completion.source_name
                )));
            }
            Err(e) => {
                log::warn!(
                    "Failed to load '{}': {}; showing placeholder",
                    completion.source_name,
                    e
                );
                self.install(&ModelTree::placeholder_cube(), None);
                self.notify(Notification::warning(format!(
                    "Could not load '{}', showing a placeholder",
                    completion.source_name
                )));
            }
        }
    }

    /// Replace the model subtree with `tree`, posed and shaded with the current edits.
    fn install(&mut self, tree: &ModelTree, name: Option<String>) {
        if let Some(old) = self.model_root.take() {
            self.graph.remove(old);
        }

        let scene_root = self.graph.root();
        let root = tree.instantiate(&mut self.graph, scene_root);
        self.graph.set_transform(root, self.pose.to_transform());
        apply_material(&mut self.graph, root, &self.material);
        self.material_dirty = false;

        self.model_root = Some(root);
        self.model_name = name;
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        // Shown as-is until the next frame layers animations on top
        if let Some(root) = self.model_root {
            self.graph.set_transform(root, pose.to_transform());
        }
    }

    pub fn set_material(&mut self, material: MaterialSpec) {
        let material = material.clamped();
        if material != self.material {
            self.material = material;
            self.material_dirty = true;
        }
    }

    pub fn set_animation(&mut self, animation: AnimationState) {
        self.animation = animation.clamped();
    }

    pub fn set_lighting(&mut self, lighting: LightingSettings) {
        self.lighting = lighting;
    }

    /// Flip the master animation flag and persist it.
    ///
    /// The flag changes even if persisting fails; the store error is returned.
    pub fn set_animations_enabled(&mut self, enabled: bool) -> Result<()> {
        self.animations_enabled = enabled;
        storage::save_json(self.store.as_mut(), ANIMATIONS_KEY, &enabled)
    }

    /// Track the platform reduced-motion preference. Turning it on disables animations.
    pub fn set_prefers_reduced_motion(&mut self, prefers: bool) -> Result<()> {
        self.prefers_reduced_motion = prefers;
        if prefers && self.animations_enabled {
            log::info!("Reduced motion requested; disabling animations");
            return self.set_animations_enabled(false);
        }
        Ok(())
    }

    /// Restore default pose, material and animations. Lighting and the loaded model are kept.
    pub fn reset(&mut self) {
        self.set_pose(Pose::default());
        self.set_material(MaterialSpec::default());
        self.animation = AnimationState::default();
        self.evaluator.reset(&self.pose);
        log::info!("Session reset to defaults");
        self.notify(Notification::info("Model reset to defaults"));
    }

    /// Visible meshes with world transforms, for the renderer.
    pub fn render_items(&mut self) -> Vec<RenderItem> {
        self.graph.flatten()
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Current edits as an export record. Fails while the placeholder is shown.
    pub fn model_record(&self) -> Result<ModelRecord> {
        let name = self.model_name.as_ref().ok_or(Error::NoModelLoaded)?;
        Ok(ModelRecord::new(&self.pose, &self.material, name.clone()))
    }

    pub fn export_config(&mut self, now: DateTime<Utc>) -> Result<ConfigExport> {
        let export = ConfigExport::new(self.model_record()?, now);
        self.notify(Notification::success("Model configuration exported"));
        Ok(export)
    }

    /// Append the current edits to the store's saved-model list.
    pub fn save_model(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let record = self.model_record()?;
        match export::save_model(self.store.as_mut(), record, now, self.config.saved_model_limit) {
            Ok(count) => {
                self.notify(Notification::success("Model saved to storage"));
                Ok(count)
            }
            Err(e) => {
                log::warn!("Saving model failed: {}", e);
                self.notify(Notification::error("Failed to save model"));
                Err(e)
            }
        }
    }

    /// Encode a viewport capture. Returns the download file name and the encoded bytes.
    pub fn export_snapshot(
        &mut self,
        snapshot: &Snapshot,
        format: SnapshotFormat,
        now: DateTime<Utc>,
    ) -> Result<(String, Vec<u8>)> {
        self.model_record()?;
        let bytes = snapshot.encode(format).inspect_err(|e| {
            log::warn!("Snapshot export failed: {}", e);
        })?;
        self.notify(Notification::success(format!(
            "Screenshot exported as {}",
            format.extension().to_uppercase()
        )));
        Ok((Snapshot::file_name(format, now), bytes))
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn material(&self) -> &MaterialSpec {
        &self.material
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn lighting(&self) -> &LightingSettings {
        &self.lighting
    }

    pub fn animations_enabled(&self) -> bool {
        self.animations_enabled
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.prefers_reduced_motion
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn model_root(&self) -> Option<SceneNodeId> {
        self.model_root
    }

    /// File name of the loaded model, `None` while showing the placeholder.
    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    pub fn has_model(&self) -> bool {
        self.model_name.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.as_ref().is_some_and(|q| q.is_loading())
    }

    /// File name of the load in progress.
    pub fn pending_source(&self) -> Option<&str> {
        self.pending_source.as_deref()
    }

    pub fn evaluator(&self) -> &TransformEvaluator {
        &self.evaluator
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    use crate::material::HexColor;
    use crate::scene::NodeContent;
    use crate::session::storage::MemoryStore;
    use crate::session::notify::NotificationLevel;

    fn session() -> EditorSession {
        EditorSession::new(ViewerConfig::default(), Box::new(MemoryStore::new()))
    }

    fn root_transform(session: &EditorSession) -> crate::scene::LocalTransform {
        let root = session.model_root().unwrap();
        session.graph().get(root).unwrap().local_transform
    }

    #[test]
    fn test_starts_with_placeholder() {
        let mut session = session();
        assert!(!session.has_model());
        assert!(session.animations_enabled());

        let items = session.render_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].geometry.triangle_count(), 12);
        assert!(items[0].cast_shadow && items[0].receive_shadow);
    }

    #[test]
    fn test_animation_flag_from_store_and_preference() {
        let mut store = MemoryStore::new();
        store.set(ANIMATIONS_KEY, "false".into()).unwrap();
        let session = EditorSession::new(ViewerConfig::default(), Box::new(store));
        assert!(!session.animations_enabled());

        let config = ViewerConfig {
            prefers_reduced_motion: true,
            ..Default::default()
        };
        let session = EditorSession::new(config, Box::new(MemoryStore::new()));
        assert!(!session.animations_enabled());
    }

    #[test]
    fn test_animation_flag_persisted() {
        let mut session = session();
        session.set_animations_enabled(false).unwrap();
        assert_eq!(session.store().get(ANIMATIONS_KEY).as_deref(), Some("false"));

        session.set_animations_enabled(true).unwrap();
        session.set_prefers_reduced_motion(true).unwrap();
        assert!(!session.animations_enabled());
        assert_eq!(session.store().get(ANIMATIONS_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_frame_applies_pose_and_rotation() {
        let mut session = session();
        session.set_animation(AnimationState {
            rotate: true,
            ..Default::default()
        });

        assert!(session.frame(0.0));
        assert!((root_transform(&session).rotation.y - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_animations_show_pose() {
        let mut session = session();
        session.set_animations_enabled(false).unwrap();
        session.set_animation(AnimationState {
            bounce: true,
            ..Default::default()
        });

        let pose = Pose::default().with_position(Vec3::new(1.0, 2.0, 3.0));
        session.set_pose(pose);
        assert!(!session.frame(0.7));
        assert_eq!(root_transform(&session), pose.to_transform());
    }

    #[test]
    fn test_material_change_applied_on_next_frame() {
        let mut session = session();
        let red = MaterialSpec {
            color: HexColor::rgb(0xff, 0, 0),
            ..Default::default()
        };
        session.set_material(red);
        assert_ne!(session.render_items()[0].material.base_color, [1.0, 0.0, 0.0]);

        session.frame(0.0);
        assert_eq!(session.render_items()[0].material.base_color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = session();
        session.set_pose(Pose::default().with_scale(Vec3::splat(3.0)));
        session.set_animation(AnimationState {
            hover: true,
            speed: 2.0,
            ..Default::default()
        });
        session.set_lighting(LightingSettings {
            intensity: 2.0,
            ..Default::default()
        });

        session.reset();

        assert_eq!(*session.pose(), Pose::default());
        assert_eq!(*session.animation(), AnimationState::default());
        assert_eq!(session.lighting().intensity, 2.0);
        let notes = session.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Info);
        assert!(session.drain_notifications().is_empty());
    }

    #[test]
    fn test_missing_target_is_noop() {
        let mut session = session();
        let root = session.model_root().unwrap();
        session.graph.remove(root);
        assert!(!session.frame(1.0));
        assert_eq!(session.evaluator().spin(), 0.0);
    }

    #[test]
    fn test_exports_require_model() {
        let mut session = session();
        assert!(matches!(session.export_config(Utc::now()), Err(Error::NoModelLoaded)));
        assert!(matches!(session.save_model(Utc::now()), Err(Error::NoModelLoaded)));
    }

    #[test]
    fn test_request_load_without_loader() {
        let mut session = session();
        let source = ModelSource::memory("tri.obj", b"v 0 0 0\n".to_vec());
        assert!(matches!(session.request_load(source), Err(Error::LoaderUnavailable)));
    }

    #[test]
    fn test_request_load_rejects_unsupported() {
        let mut session = session();
        let result = session.request_load(ModelSource::memory("scene.blend", vec![0u8]));
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
        assert_eq!(session.drain_notifications()[0].level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_placeholder() {
        let mut session =
            EditorSession::with_current_runtime(ViewerConfig::default(), Box::new(MemoryStore::new()))
                .unwrap();

        session
            .request_load(ModelSource::file("/no/such/dir/model.glb"))
            .expect("file problems surface through the loader");
        assert!(session.wait_for_load().await);

        assert!(!session.has_model());
        assert!(session.model_root().is_some());
        assert_eq!(session.render_items()[0].geometry.triangle_count(), 12);

        let notes = session.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Warning);
    }

    #[test]
    fn test_oversized_upload_rejected_up_front() {
        let config = ViewerConfig {
            max_upload_bytes: 1024 * 1024,
            ..Default::default()
        };
        let mut session = EditorSession::new(config, Box::new(MemoryStore::new()));
        let source = ModelSource::memory("huge.glb", vec![0u8; 1024 * 1024 + 1]);

        assert!(matches!(session.request_load(source), Err(Error::FileTooLarge { .. })));
        let notes = session.drain_notifications();
        assert_eq!(notes[0].message, "File size must be less than 1MB");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_frame_picks_up_finished_load() {
        let mut session =
            EditorSession::with_current_runtime(ViewerConfig::default(), Box::new(MemoryStore::new()))
                .unwrap();
        session.set_animation(AnimationState {
            rotate: true,
            ..Default::default()
        });

        let source = ModelSource::memory("tri.obj", b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n".to_vec());
        session.request_load(source).unwrap();

        let mut frames = 0;
        while !session.has_model() {
            assert!(frames < 400, "load never reached the frame loop");
            session.frame(frames as f32 / 60.0);
            frames += 1;
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        assert!(!session.is_loading());
        assert!(session.pending_source().is_none());
        assert_eq!(session.model_name(), Some("tri.obj"));
        assert_eq!(session.render_items()[0].geometry.triangle_count(), 1);
        assert_eq!(session.drain_notifications()[0].level, NotificationLevel::Success);

        // The new model is animated from the next frame on
        assert!(session.frame(1.0));
    }

    #[tokio::test]
    async fn test_load_installs_model() {
        let mut session =
            EditorSession::with_current_runtime(ViewerConfig::default(), Box::new(MemoryStore::new()))
                .unwrap();
        session.set_pose(Pose::default().with_position(Vec3::new(0.0, 1.0, 0.0)));

        let source = ModelSource::memory("tri.obj", b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n".to_vec());
        session.request_load(source).unwrap();
        assert!(session.is_loading());
        assert_eq!(session.pending_source(), Some("tri.obj"));

        assert!(session.wait_for_load().await);
        assert_eq!(session.model_name(), Some("tri.obj"));
        assert_eq!(root_transform(&session).position, Vec3::new(0.0, 1.0, 0.0));

        let items = session.render_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].geometry.triangle_count(), 1);

        let record = session.model_record().unwrap();
        assert_eq!(record.file_name, "tri.obj");
        assert!(matches!(
            session.graph().get(session.model_root().unwrap()).unwrap().content,
            NodeContent::Group
        ));
    }
}
