mod component;
mod layout;
mod render;
mod state;

pub use component::GraphCanvas;
pub use layout::Layout;
pub use render::class_color;
pub use state::CanvasState;
