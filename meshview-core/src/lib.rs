/// meshview core library - geometry pipeline and interactive renderer
///
/// This library holds everything that does not touch a real window or
/// terminal: OBJ/MTL parsing, load-time normalization, the camera and
/// projection model, face shading and ordering, the input controller and the
/// per-frame renderer that draws onto any [`Surface`].

pub mod color;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod library;
pub mod normalize;
pub mod obj;
pub mod projection;
pub mod render;
pub mod shading;
pub mod texture;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use color::Color;
pub use controller::{Command, Controller, HeldKeys, Response, ZoomStep};
pub use error::{MeshError, Result};
pub use geometry::{Edge, Face, Material, Mesh, TexCoord, Texture, Vertex};
pub use library::ModelSlots;
pub use projection::{project, Camera, ProjectedPoint, Viewport};
pub use render::{FrameRenderer, FrameStats, Rect, Surface};
pub use texture::{ImageTextureLoader, TextureLoader};
pub use transform::{RotationState, Transform};
pub use view::{AutoMode, ViewState};
