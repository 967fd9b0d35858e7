mod core;

pub use self::core::{HandEngine, MotionRequest};
