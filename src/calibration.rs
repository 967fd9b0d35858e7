use crate::controller::HandController;
use crate::hal::{Clock, LimitSwitch, MotionActuator, StatusIndicator, TouchProbe};
use crate::telemetry;

// Terminal homing failure. After this error the rig's true position is
// unknown and nothing may command further motion; the host surfaces the
// fault (the reference rig blinks its indicator until power-cycled) and
// must not re-enter the control loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationFault {
    SwitchNeverEngaged { position: i32 },
}

impl CalibrationFault {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SwitchNeverEngaged { .. } => "limit switch never engaged",
        }
    }
}

// Blocking setup routines. These own the loop for their whole duration,
// which is the one sanctioned exception to the non-blocking rule: they run
// once, supervised, before steady-state operation starts.
impl<A, S, P, I> HandController<A, S, P, I>
where
    A: MotionActuator,
    S: LimitSwitch,
    P: TouchProbe,
    I: StatusIndicator,
{
    // Warm-up fill: feeds the classifier stack at the usual sampling
    // interval while easing the actuator back to zero. Without this pass the
    // zero-initialized stack drags the baseline down and the first verdicts
    // are garbage.
    pub fn fill<C: Clock>(&mut self, clock: &C, duration_ms: u64) {
        self.indicator.set_active(true);
        self.actuator.set_profile(self.motor.opening);
        self.actuator.move_to(0);

        let started_ms = clock.now_ms();
        loop {
            let now_ms = clock.now_ms();
            if now_ms.saturating_sub(started_ms) >= duration_ms {
                break;
            }
            if self.classifier.sample_due(now_ms) {
                let raw = self.probe.read();
                let _ = self.classifier.warm(now_ms, raw);
            }
            self.actuator.step();
        }
        self.indicator.set_active(false);
    }

    // Homing pass: drives toward failsafe and polls the limit switch on
    // every step. Engagement anchors the coordinate system by rewriting the
    // position reference to limit. Reaching failsafe without ever seeing
    // the switch is fatal; the indicator is left on for the host's fault
    // pattern to take over.
    pub fn home(&mut self) -> Result<(), CalibrationFault> {
        self.indicator.set_active(true);
        self.actuator.set_profile(self.motor.calibration);
        self.actuator.move_to(self.motor.failsafe);

        while !self.switch.engaged() {
            self.actuator.step();
            if self.actuator.current_position() >= self.motor.failsafe {
                telemetry::record_calibration_fault();
                return Err(CalibrationFault::SwitchNeverEngaged {
                    position: self.actuator.current_position(),
                });
            }
        }

        self.actuator.set_current_position(self.motor.limit);
        self.indicator.set_active(false);
        Ok(())
    }
}
