pub mod automation;
pub mod window;

pub use automation::*;
pub use window::*;
