use crate::config::MotionProfile;

// Stepper facade. The core only selects a profile, writes a target and reads
// positions back; pulse timing and acceleration ramping live behind this.
pub trait MotionActuator {
    fn set_profile(&mut self, profile: MotionProfile);
    fn move_to(&mut self, target: i32);
    // One pulse-scheduling slice per loop iteration.
    fn step(&mut self);
    fn current_position(&self) -> i32;
    // Rewrites the position reference without moving the mechanism.
    fn set_current_position(&mut self, position: i32);
    fn target_position(&self) -> i32;
}

// Homing reference switch, polarity already folded in by the implementation.
pub trait LimitSwitch {
    fn engaged(&mut self) -> bool;
}

// Capacitive input. Readings are raw sensor units with unknown polarity.
pub trait TouchProbe {
    fn read(&mut self) -> u16;
}

pub trait StatusIndicator {
    fn set_active(&mut self, active: bool);
}

// Monotonic millisecond clock, needed only by the blocking setup routines.
// Steady-state stepping takes now_ms as an argument instead.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// Diagnostics text sink; receives one formatted plot line per call.
pub trait TraceSink {
    fn write_line(&mut self, line: &str);
}
