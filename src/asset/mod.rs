//! Model loading: format detection, decoders, and the background load queue

pub mod format;
pub mod gltf;
pub mod loader;
pub mod obj;
pub mod queue;
pub mod source;
pub mod tree;

pub use format::ModelFormat;
pub use self::gltf::GltfLoader;
pub use loader::{LoaderRegistry, ModelLoader};
pub use obj::ObjLoader;
pub use queue::{LoadCompletion, LoadQueue, LoadTicket};
pub use source::ModelSource;
pub use tree::{ModelNode, ModelTree};
