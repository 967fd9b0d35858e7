use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::config::{MotionProfile, MotorConfig};
use crate::gesture::{ComeHere, Wiggle};
use crate::telemetry;
use crate::types::{HandCommand, HandState};

// Profile plus target produced by one machine step, ready to hand to the
// motion actuator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionRequest {
    pub profile: MotionProfile,
    pub target: i32,
}

#[derive(Clone, Copy, Debug)]
enum HandHsmEvent {
    Step,
    Command(HandCommand),
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    now_ms: u64,
    position: i32,
    request: Option<MotionRequest>,
}

// Where and when a release was detected; drives the hold target and the
// hold deadline while remaining. Discarded on the way out of the state.
#[derive(Clone, Copy, Debug)]
struct RemainAnchor {
    anchored_ms: u64,
    position: i32,
}

struct HandHsm {
    config: MotorConfig,
    come: ComeHere,
    wiggle: Wiggle,
    remain_anchor: Option<RemainAnchor>,
    phase: HandState,
}

impl HandHsm {
    fn new(config: MotorConfig, wiggle_seed: u32) -> Self {
        Self {
            config,
            come: ComeHere::new(config.come_amplitude, config.come_period_ms),
            wiggle: Wiggle::new(
                config.wiggle_interval_ms,
                config.wiggle_magnitude,
                wiggle_seed,
            ),
            remain_anchor: None,
            phase: HandState::Opening,
        }
    }

    // A hand that was barely closed reopens right away; past the remain
    // threshold it holds near the release point first.
    fn begin_release(&mut self, context: &DispatchContext) -> Outcome<State> {
        if context.position >= self.config.remain_threshold {
            self.remain_anchor = Some(RemainAnchor {
                anchored_ms: context.now_ms,
                position: context.position,
            });
            self.phase = HandState::Remaining;
            telemetry::record_remain_entry();
            Transition(State::remaining())
        } else {
            self.phase = HandState::Opening;
            Transition(State::opening())
        }
    }

    fn remain_target(&self, anchor: RemainAnchor) -> i32 {
        (anchor.position + self.config.remain_overstep).min(self.config.max)
    }
}

#[state_machine(initial = "State::opening()")]
impl HandHsm {
    #[state]
    fn opening(&mut self, context: &mut DispatchContext, event: &HandHsmEvent) -> Outcome<State> {
        match event {
            HandHsmEvent::Step => {
                context.request = Some(MotionRequest {
                    profile: self.config.opening,
                    target: self.come.target(context.now_ms),
                });
                Handled
            }
            HandHsmEvent::Command(HandCommand::Close) => {
                self.phase = HandState::Closing;
                Transition(State::closing())
            }
            HandHsmEvent::Command(HandCommand::Open) => self.begin_release(context),
        }
    }

    #[state]
    fn closing(&mut self, context: &mut DispatchContext, event: &HandHsmEvent) -> Outcome<State> {
        match event {
            HandHsmEvent::Step => {
                let target = self.wiggle.target(context.now_ms, self.config.max, -1);
                context.request = Some(MotionRequest {
                    profile: self.config.closing,
                    target,
                });
                Handled
            }
            HandHsmEvent::Command(HandCommand::Open) => self.begin_release(context),
            HandHsmEvent::Command(HandCommand::Close) => Handled,
        }
    }

    #[state]
    fn remaining(&mut self, context: &mut DispatchContext, event: &HandHsmEvent) -> Outcome<State> {
        match event {
            HandHsmEvent::Step => {
                let Some(anchor) = self.remain_anchor else {
                    self.phase = HandState::Opening;
                    return Transition(State::opening());
                };
                // Push slightly past the release point instead of reversing
                // on the spot, then hold until the remain window runs out.
                context.request = Some(MotionRequest {
                    profile: self.config.opening,
                    target: self.remain_target(anchor),
                });
                if context.now_ms > anchor.anchored_ms + self.config.remain_duration_ms {
                    self.remain_anchor = None;
                    self.phase = HandState::Opening;
                    return Transition(State::opening());
                }
                Handled
            }
            HandHsmEvent::Command(HandCommand::Close) => {
                self.remain_anchor = None;
                self.phase = HandState::Closing;
                Transition(State::closing())
            }
            HandHsmEvent::Command(HandCommand::Open) => {
                // A repeated release refreshes the hold window.
                self.remain_anchor = Some(RemainAnchor {
                    anchored_ms: context.now_ms,
                    position: context.position,
                });
                Handled
            }
        }
    }
}

// Owning wrapper around the hand state machine. One step per loop
// iteration; commands may arrive at any point between steps.
pub struct HandEngine {
    machine: statig::blocking::StateMachine<HandHsm>,
}

impl HandEngine {
    pub fn new(config: MotorConfig, wiggle_seed: u32) -> Self {
        Self {
            machine: HandHsm::new(config, wiggle_seed).state_machine(),
        }
    }

    pub fn command(&mut self, command: HandCommand, now_ms: u64, position: i32) {
        let mut context = DispatchContext {
            now_ms,
            position,
            request: None,
        };
        self.machine
            .handle_with_context(&HandHsmEvent::Command(command), &mut context);
    }

    pub fn step(&mut self, now_ms: u64, position: i32) -> Option<MotionRequest> {
        let mut context = DispatchContext {
            now_ms,
            position,
            request: None,
        };
        self.machine
            .handle_with_context(&HandHsmEvent::Step, &mut context);
        context.request
    }

    // Phase readout with Open/Closed derived at the ends of travel.
    pub fn state(&self, position: i32) -> HandState {
        let inner = self.machine.inner();
        match inner.phase {
            HandState::Opening if position <= 0 => HandState::Open,
            HandState::Closing if position >= inner.config.max => HandState::Closed,
            phase => phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MotorConfig {
        MotorConfig {
            failsafe: 700,
            limit: 500,
            max: 400,
            closing: MotionProfile::new(200, 160),
            opening: MotionProfile::new(80, 60),
            calibration: MotionProfile::new(40, 30),
            remain_overstep: 40,
            remain_duration_ms: 300,
            remain_threshold: 200,
            come_amplitude: 120,
            come_period_ms: 1_000,
            wiggle_interval_ms: 50,
            wiggle_magnitude: 60,
        }
    }

    fn engine() -> HandEngine {
        HandEngine::new(config(), 0x5EED_1234)
    }

    #[test]
    fn starts_opening_with_the_beckoning_animation() {
        let mut engine = engine();
        let request = engine.step(250, 50).expect("missing request");
        assert_eq!(request.profile, config().opening);
        assert_eq!(request.target, ComeHere::new(120, 1_000).target(250));
        assert_eq!(engine.state(50), HandState::Opening);
        assert_eq!(engine.state(0), HandState::Open);
    }

    #[test]
    fn close_switches_to_wiggling_near_the_maximum() {
        let mut engine = engine();
        engine.command(HandCommand::Close, 0, 0);
        let request = engine.step(10, 5).expect("missing request");
        assert_eq!(request.profile, config().closing);
        assert!(request.target <= 400 && request.target > 400 - 60);
        assert_eq!(engine.state(300), HandState::Closing);
        assert_eq!(engine.state(400), HandState::Closed);
    }

    #[test]
    fn release_below_the_threshold_reopens_immediately() {
        let mut engine = engine();
        engine.command(HandCommand::Close, 0, 0);
        engine.command(HandCommand::Open, 100, 150);
        assert_eq!(engine.state(150), HandState::Opening);
        let request = engine.step(110, 150).expect("missing request");
        assert_eq!(request.profile, config().opening);
    }

    #[test]
    fn release_past_the_threshold_holds_then_reopens() {
        let mut engine = engine();
        engine.command(HandCommand::Close, 0, 0);
        engine.command(HandCommand::Open, 1_000, 350);
        assert_eq!(engine.state(350), HandState::Remaining);

        let request = engine.step(1_010, 350).expect("missing request");
        assert_eq!(request.profile, config().opening);
        assert_eq!(request.target, 390);

        // Hold keeps the same target until the remain window runs out.
        let request = engine.step(1_200, 380).expect("missing request");
        assert_eq!(request.target, 390);
        assert_eq!(engine.state(380), HandState::Remaining);

        let _ = engine.step(1_301, 390);
        assert_eq!(engine.state(390), HandState::Opening);
    }

    #[test]
    fn remain_target_never_exceeds_the_maximum() {
        let mut engine = engine();
        engine.command(HandCommand::Close, 0, 0);
        engine.command(HandCommand::Open, 0, 390);
        let request = engine.step(10, 390).expect("missing request");
        assert_eq!(request.target, 400);
    }

    #[test]
    fn touch_during_the_hold_closes_again() {
        let mut engine = engine();
        engine.command(HandCommand::Close, 0, 0);
        engine.command(HandCommand::Open, 0, 350);
        engine.command(HandCommand::Close, 50, 360);
        assert_eq!(engine.state(360), HandState::Closing);
    }
}
