pub mod cluster;
pub mod fallback;
pub mod markers;
pub mod symbology;

pub use cluster::*;
pub use fallback::*;
pub use markers::*;
pub use symbology::*;
