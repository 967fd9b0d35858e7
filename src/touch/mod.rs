mod core;

pub use self::core::{TouchClassifier, TouchSnapshot, TOUCH_STACK_CAP};
