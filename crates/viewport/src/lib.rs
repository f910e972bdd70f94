//! Supplier map viewport: deferred mount, process-wide degradation, camera
//! framing and hover synchronization with the journey view.

pub mod camera;
pub mod config;
pub mod degradation;
pub mod error;
pub mod hover;
pub mod map;
pub mod mount;
pub mod view;

pub use camera::*;
pub use config::*;
pub use degradation::*;
pub use error::*;
pub use hover::*;
pub use map::*;
pub use mount::*;
pub use view::*;
