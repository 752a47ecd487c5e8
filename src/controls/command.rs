//! JSON control protocol over the editing session.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationState, Pose};
use crate::asset::ModelSource;
use crate::core::Result;
use crate::material::MaterialSpec;
use crate::scene::LightingSettings;
use crate::session::{ConfigExport, EditorSession, Notification};

use super::animation::{self, AnimationKind};
use super::{Axis, lighting, material, transform};

/// Panel actions as data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum ControlCommand {
    /// Position slider (clamped to -10..10)
    SetPosition { axis: Axis, value: f32 },
    /// Position number field (unclamped)
    SetPositionTyped { axis: Axis, input: String },
    /// Rotation in degrees (-180..180)
    SetRotation { axis: Axis, degrees: f32 },
    SetRotationTyped { axis: Axis, input: String },
    /// Per-axis scale (0.1..5)
    SetScale { axis: Axis, value: f32 },
    SetScaleTyped { axis: Axis, input: String },
    SetUniformScale { value: f32 },
    /// Base color as `#rrggbb`
    SetColor { hex: String },
    /// Base color from the swatch palette
    SetPresetColor { index: usize },
    SetEmissive { hex: String },
    SetRoughness { value: f32 },
    SetMetalness { value: f32 },
    /// Directional light intensity (0..3)
    SetLightIntensity { value: f32 },
    SetLightColor { hex: String },
    /// Directional light position (-20..20 per axis)
    SetLightPosition { axis: Axis, value: f32 },
    SetAnimation { kind: AnimationKind, enabled: bool },
    ToggleAnimation { kind: AnimationKind },
    /// Animation speed multiplier (0.1..3)
    SetSpeed { value: f32 },
    /// Master animation switch, persisted
    SetAnimationsEnabled { enabled: bool },
    /// Start loading a model file
    LoadModel { path: PathBuf },
    /// Restore default pose, material and animations
    Reset,
    /// Get the current editable state
    GetState,
    /// Build the JSON configuration export
    ExportConfig,
    /// Append the current model to the saved-model list
    SaveModel,
    /// Take pending notifications
    DrainNotifications,
}

/// Reply to a `ControlCommand`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ControlResponse {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    None,
    State(SessionState),
    Export {
        file_name: String,
        config: ConfigExport,
    },
    Saved {
        count: usize,
    },
    LoadStarted {
        ticket: u64,
    },
    Notifications {
        notifications: Vec<Notification>,
    },
}

/// Snapshot of the editable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub pose: Pose,
    pub material: MaterialSpec,
    pub animation: AnimationState,
    pub lighting: LightingSettings,
    pub animations_enabled: bool,
    pub model_name: Option<String>,
    pub loading: bool,
}

impl SessionState {
    pub fn capture(session: &EditorSession) -> Self {
        Self {
            pose: *session.pose(),
            material: *session.material(),
            animation: *session.animation(),
            lighting: *session.lighting(),
            animations_enabled: session.animations_enabled(),
            model_name: session.model_name().map(str::to_string),
            loading: session.is_loading(),
        }
    }
}

impl ControlResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }

    pub fn none() -> Self {
        Self::ok(ResponseData::None)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

impl ControlCommand {
    /// Run against `session`; failures become an error response.
    pub fn execute(self, session: &mut EditorSession) -> ControlResponse {
        log::debug!("Control command: {:?}", self);
        match self.apply(session) {
            Ok(data) => ControlResponse::ok(data),
            Err(e) => ControlResponse::error(e.to_string()),
        }
    }

    fn apply(self, session: &mut EditorSession) -> Result<ResponseData> {
        let pose = *session.pose();
        let spec = *session.material();
        let light = *session.lighting();
        let anim = *session.animation();

        match self {
            ControlCommand::SetPosition { axis, value } => {
                session.set_pose(transform::set_position(pose, axis, value))
            }
            ControlCommand::SetPositionTyped { axis, input } => {
                session.set_pose(transform::set_position_typed(pose, axis, &input))
            }
            ControlCommand::SetRotation { axis, degrees } => {
                session.set_pose(transform::set_rotation_degrees(pose, axis, degrees))
            }
            ControlCommand::SetRotationTyped { axis, input } => {
                session.set_pose(transform::set_rotation_typed(pose, axis, &input))
            }
            ControlCommand::SetScale { axis, value } => {
                session.set_pose(transform::set_scale(pose, axis, value))
            }
            ControlCommand::SetScaleTyped { axis, input } => {
                session.set_pose(transform::set_scale_typed(pose, axis, &input))
            }
            ControlCommand::SetUniformScale { value } => {
                session.set_pose(transform::set_uniform_scale(pose, value))
            }
            ControlCommand::SetColor { hex } => session.set_material(material::set_color(spec, &hex)?),
            ControlCommand::SetPresetColor { index } => {
                session.set_material(material::set_preset_color(spec, index))
            }
            ControlCommand::SetEmissive { hex } => {
                session.set_material(material::set_emissive(spec, &hex)?)
            }
            ControlCommand::SetRoughness { value } => {
                session.set_material(material::set_roughness(spec, value))
            }
            ControlCommand::SetMetalness { value } => {
                session.set_material(material::set_metalness(spec, value))
            }
            ControlCommand::SetLightIntensity { value } => {
                session.set_lighting(lighting::set_intensity(light, value))
            }
            ControlCommand::SetLightColor { hex } => {
                session.set_lighting(lighting::set_color(light, &hex)?)
            }
            ControlCommand::SetLightPosition { axis, value } => {
                session.set_lighting(lighting::set_position(light, axis, value))
            }
            ControlCommand::SetAnimation { kind, enabled } => {
                session.set_animation(animation::set_enabled(anim, kind, enabled))
            }
            ControlCommand::ToggleAnimation { kind } => {
                session.set_animation(animation::toggle(anim, kind))
            }
            ControlCommand::SetSpeed { value } => {
                session.set_animation(animation::set_speed(anim, value))
            }
            ControlCommand::SetAnimationsEnabled { enabled } => session.set_animations_enabled(enabled)?,
            ControlCommand::LoadModel { path } => {
                let ticket = session.request_load(ModelSource::file(path))?;
                return Ok(ResponseData::LoadStarted { ticket: ticket.0 });
            }
            ControlCommand::Reset => session.reset(),
            ControlCommand::GetState => {
                return Ok(ResponseData::State(SessionState::capture(session)));
            }
            ControlCommand::ExportConfig => {
                let config = session.export_config(Utc::now())?;
                return Ok(ResponseData::Export {
                    file_name: config.file_name(),
                    config,
                });
            }
            ControlCommand::SaveModel => {
                let count = session.save_model(Utc::now())?;
                return Ok(ResponseData::Saved { count });
            }
            ControlCommand::DrainNotifications => {
                return Ok(ResponseData::Notifications {
                    notifications: session.drain_notifications(),
                });
            }
        }

        Ok(ResponseData::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    use crate::scene::ViewerConfig;
    use crate::session::MemoryStore;

    fn session() -> EditorSession {
        EditorSession::new(ViewerConfig::default(), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_command_wire_format() {
        let cmd: ControlCommand =
            serde_json::from_str(r#"{"cmd":"SetPosition","params":{"axis":"y","value":2.5}}"#).unwrap();
        assert!(matches!(cmd, ControlCommand::SetPosition { axis: Axis::Y, value } if value == 2.5));

        let json = serde_json::to_string(&ControlCommand::Reset).unwrap();
        assert_eq!(json, r#"{"cmd":"Reset"}"#);
    }

    #[test]
    fn test_commands_update_session() {
        let mut session = session();
        let commands = [
            r#"{"cmd":"SetPosition","params":{"axis":"x","value":20.0}}"#,
            r#"{"cmd":"SetRotation","params":{"axis":"y","degrees":90.0}}"#,
            r#"{"cmd":"SetUniformScale","params":{"value":2.0}}"#,
            r##"{"cmd":"SetColor","params":{"hex":"#ff0000"}}"##,
            r#"{"cmd":"SetLightIntensity","params":{"value":9.0}}"#,
            r#"{"cmd":"ToggleAnimation","params":{"kind":"hover"}}"#,
            r#"{"cmd":"SetSpeed","params":{"value":2.0}}"#,
        ];
        for json in commands {
            let cmd: ControlCommand = serde_json::from_str(json).unwrap();
            assert!(cmd.execute(&mut session).is_ok(), "{} failed", json);
        }

        assert_eq!(session.pose().position.x, 10.0);
        assert!((session.pose().rotation.y - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(session.pose().scale, Vec3::splat(2.0));
        assert_eq!(session.material().color.to_hex(), "#ff0000");
        assert_eq!(session.lighting().intensity, 3.0);
        assert!(session.animation().hover);
        assert_eq!(session.animation().speed, 2.0);
    }

    #[test]
    fn test_invalid_color_is_error_response() {
        let mut session = session();
        let response = ControlCommand::SetColor { hex: "red".into() }.execute(&mut session);
        match response {
            ControlResponse::Error { message } => assert!(message.contains("red")),
            other => panic!("expected error, got {:?}", other),
        }
        assert_eq!(*session.material(), MaterialSpec::default());
    }

    #[test]
    fn test_get_state_and_export_without_model() {
        let mut session = session();
        let response = ControlCommand::GetState.execute(&mut session);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["data"]["animations_enabled"], true);
        assert!(json["data"]["model_name"].is_null());

        assert!(!ControlCommand::ExportConfig.execute(&mut session).is_ok());
    }

    #[test]
    fn test_reset_then_drain() {
        let mut session = session();
        ControlCommand::Reset.execute(&mut session);
        match ControlCommand::DrainNotifications.execute(&mut session) {
            ControlResponse::Ok {
                data: ResponseData::Notifications { notifications },
            } => assert_eq!(notifications.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }
}
