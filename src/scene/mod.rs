//! Scene graph consumed by the evaluator and the renderer

pub mod config;
pub mod flatten;
pub mod graph;
pub mod mesh;
pub mod node;

pub use config::{CameraConfig, LightingSettings, ViewerConfig};
pub use flatten::RenderItem;
pub use graph::SceneGraph;
pub use mesh::{MeshGeometry, Vertex};
pub use node::{LocalTransform, MeshContent, NodeContent, SceneNode, SceneNodeId};
