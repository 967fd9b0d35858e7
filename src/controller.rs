use crate::config::{ConfigError, MotorConfig, TouchConfig};
use crate::hal::{LimitSwitch, MotionActuator, StatusIndicator, TouchProbe};
use crate::hand::HandEngine;
use crate::telemetry;
use crate::touch::TouchClassifier;
use crate::types::{HandCommand, HandState, TickReport};

// Top-level controller: one classifier, one hand machine, one rig. tick is
// the whole steady-state contract, exactly one sensing step, one machine
// step and one actuator step per loop iteration, never blocking. The touch
// verdict is wired to the machine edge-triggered (a rise closes, a fall
// opens); the explicit close/open commands remain public for hosts that
// drive the hand from elsewhere.
pub struct HandController<A, S, P, I> {
    pub(crate) actuator: A,
    pub(crate) switch: S,
    pub(crate) probe: P,
    pub(crate) indicator: I,
    pub(crate) classifier: TouchClassifier,
    pub(crate) engine: HandEngine,
    pub(crate) motor: MotorConfig,
    was_touched: bool,
}

impl<A, S, P, I> HandController<A, S, P, I>
where
    A: MotionActuator,
    S: LimitSwitch,
    P: TouchProbe,
    I: StatusIndicator,
{
    pub fn new(
        actuator: A,
        switch: S,
        probe: P,
        indicator: I,
        motor: MotorConfig,
        touch: TouchConfig,
        wiggle_seed: u32,
    ) -> Result<Self, ConfigError> {
        let motor = motor.validated()?;
        let touch = touch.validated()?;
        Ok(Self {
            classifier: TouchClassifier::new(touch),
            engine: HandEngine::new(motor, wiggle_seed),
            motor,
            actuator,
            switch,
            probe,
            indicator,
            was_touched: false,
        })
    }

    pub fn close(&mut self, now_ms: u64) {
        let position = self.actuator.current_position();
        self.engine.command(HandCommand::Close, now_ms, position);
        telemetry::record_hand_command();
    }

    pub fn open(&mut self, now_ms: u64) {
        let position = self.actuator.current_position();
        self.engine.command(HandCommand::Open, now_ms, position);
        telemetry::record_hand_command();
    }

    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        // Sensing step. The probe is only read when a sample is actually
        // due; capacitive reads are not free.
        let touched = if self.classifier.sample_due(now_ms) {
            let raw = self.probe.read();
            self.classifier.sample(now_ms, raw)
        } else {
            self.classifier.touched()
        };

        if touched != self.was_touched {
            if touched {
                self.close(now_ms);
            } else {
                self.open(now_ms);
            }
            self.was_touched = touched;
        }

        let position = self.actuator.current_position();
        if let Some(request) = self.engine.step(now_ms, position) {
            self.actuator.set_profile(request.profile);
            self.actuator.move_to(request.target);
        }
        self.actuator.step();

        // Passing over the switch mid-run means accumulated step drift;
        // re-anchor the position reference without a full homing pass.
        if self.switch.engaged() {
            self.actuator.set_current_position(self.motor.limit);
            telemetry::record_self_heal();
        }

        self.indicator.set_active(touched);

        let snapshot = self.classifier.snapshot();
        TickReport {
            state: self.engine.state(self.actuator.current_position()),
            touched,
            raw: snapshot.raw,
            calibration_avg: snapshot.calibration_avg,
            touch_avg: snapshot.touch_avg,
            target: self.actuator.target_position(),
            position: self.actuator.current_position(),
        }
    }

    pub fn state(&self) -> HandState {
        self.engine.state(self.actuator.current_position())
    }

    pub fn touched(&self) -> bool {
        self.classifier.touched()
    }

    pub fn last_touched_ms(&self) -> u64 {
        self.classifier.last_touched_ms()
    }

    pub fn classifier(&self) -> &TouchClassifier {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut TouchClassifier {
        &mut self.classifier
    }
}
