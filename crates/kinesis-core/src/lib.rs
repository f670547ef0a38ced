pub mod adapters;
pub mod axis;
pub mod config;
pub mod constants;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod scheduler;
pub mod signal;
pub mod smoother;
pub mod transform;

pub use adapters::{Adapter, Cx, InputEvent, Mount, Reconfigure, TransformState};
pub use error::{ConstructionError, Result};
pub use host::{Layout, Node, Rect, StyleSink, Surface};
pub use lifecycle::{Controller, Lifecycle};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle};
