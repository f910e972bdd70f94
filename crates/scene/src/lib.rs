pub mod camera;
pub mod hover;
pub mod resolver;
pub mod supplier;
pub mod visibility;

pub use camera::*;
pub use hover::*;
pub use resolver::*;
pub use supplier::*;
pub use visibility::*;
