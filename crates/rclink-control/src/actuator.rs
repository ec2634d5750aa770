use tracing::debug;

use crate::error::{ControlError, Result};

/// Direction and power of one actuator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveState {
    Forward { power: f32 },
    Reverse { power: f32 },
    Neutral,
}

/// Hardware seam: something that can take on a drive state.
///
/// Implementations own the pin/PWM plumbing, which is outside this crate.
pub trait Actuator: Send {
    /// Apply a new drive state.
    fn set(&mut self, state: DriveState);

    /// Release any exclusively-owned hardware resource. Called once, from
    /// [`MotionController::exit`].
    fn release(&mut self) {}
}

/// Actuator that does nothing. Used in tests and dry runs.
#[derive(Debug, Default)]
pub struct NullActuator;

impl Actuator for NullActuator {
    fn set(&mut self, _state: DriveState) {}
}

/// Actuator that logs every state change instead of driving hardware.
#[derive(Debug)]
pub struct LogActuator {
    name: &'static str,
}

impl LogActuator {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Actuator for LogActuator {
    fn set(&mut self, state: DriveState) {
        debug!(actuator = self.name, ?state, "actuator state");
    }

    fn release(&mut self) {
        debug!(actuator = self.name, "actuator released");
    }
}

/// Per-actuator control state machine.
///
/// Transitions are driven exclusively by decoded commands; the transport
/// never mutates actuation state directly. Power outside [0,100] is a
/// caller contract violation and leaves the state unchanged.
pub struct MotionController {
    state: DriveState,
    actuator: Option<Box<dyn Actuator>>,
}

impl MotionController {
    pub fn new(actuator: Box<dyn Actuator>) -> Self {
        Self {
            state: DriveState::Neutral,
            actuator: Some(actuator),
        }
    }

    /// Current drive state.
    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Transition to FORWARD at `power` percent.
    pub fn forward(&mut self, power: f32) -> Result<()> {
        self.transition(DriveState::Forward {
            power: validate_power(power)?,
        });
        Ok(())
    }

    /// Transition to REVERSE at `power` percent.
    pub fn reverse(&mut self, power: f32) -> Result<()> {
        self.transition(DriveState::Reverse {
            power: validate_power(power)?,
        });
        Ok(())
    }

    /// Transition to NEUTRAL.
    pub fn neutral(&mut self) {
        self.transition(DriveState::Neutral);
    }

    /// Force NEUTRAL and release the hardware handle.
    ///
    /// Safe to call from any state; a second call is a no-op.
    pub fn exit(&mut self) {
        self.state = DriveState::Neutral;
        if let Some(mut actuator) = self.actuator.take() {
            actuator.set(DriveState::Neutral);
            actuator.release();
        }
    }

    fn transition(&mut self, state: DriveState) {
        self.state = state;
        if let Some(actuator) = self.actuator.as_mut() {
            actuator.set(state);
        }
    }
}

fn validate_power(power: f32) -> Result<f32> {
    if (0.0..=100.0).contains(&power) {
        Ok(power)
    } else {
        Err(ControlError::PowerOutOfRange(power))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Records applied states and release calls.
    struct SpyActuator {
        states: Arc<std::sync::Mutex<Vec<DriveState>>>,
        releases: Arc<AtomicU32>,
    }

    impl Actuator for SpyActuator {
        fn set(&mut self, state: DriveState) {
            self.states.lock().unwrap().push(state);
        }

        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn spy() -> (MotionController, Arc<std::sync::Mutex<Vec<DriveState>>>, Arc<AtomicU32>) {
        let states = Arc::new(std::sync::Mutex::new(Vec::new()));
        let releases = Arc::new(AtomicU32::new(0));
        let controller = MotionController::new(Box::new(SpyActuator {
            states: states.clone(),
            releases: releases.clone(),
        }));
        (controller, states, releases)
    }

    #[test]
    fn starts_neutral() {
        let (controller, _states, _releases) = spy();
        assert_eq!(controller.state(), DriveState::Neutral);
    }

    #[test]
    fn transitions_follow_commands() {
        let (mut controller, states, _releases) = spy();

        controller.forward(50.0).unwrap();
        assert_eq!(controller.state(), DriveState::Forward { power: 50.0 });

        controller.reverse(30.0).unwrap();
        assert_eq!(controller.state(), DriveState::Reverse { power: 30.0 });

        controller.neutral();
        assert_eq!(controller.state(), DriveState::Neutral);

        assert_eq!(
            *states.lock().unwrap(),
            vec![
                DriveState::Forward { power: 50.0 },
                DriveState::Reverse { power: 30.0 },
                DriveState::Neutral,
            ]
        );
    }

    #[test]
    fn exit_forces_neutral_from_any_state() {
        let (mut controller, _states, releases) = spy();

        controller.forward(50.0).unwrap();
        controller.reverse(30.0).unwrap();
        controller.exit();

        assert_eq!(controller.state(), DriveState::Neutral);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn exit_twice_is_safe_and_releases_once() {
        let (mut controller, _states, releases) = spy();

        controller.exit();
        controller.exit();

        assert_eq!(controller.state(), DriveState::Neutral);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn out_of_range_power_errors_without_state_change() {
        let (mut controller, states, _releases) = spy();
        controller.forward(40.0).unwrap();

        assert!(matches!(
            controller.forward(100.5).unwrap_err(),
            ControlError::PowerOutOfRange(_)
        ));
        assert!(matches!(
            controller.reverse(-1.0).unwrap_err(),
            ControlError::PowerOutOfRange(_)
        ));
        assert!(controller.forward(f32::NAN).is_err());

        assert_eq!(controller.state(), DriveState::Forward { power: 40.0 });
        assert_eq!(states.lock().unwrap().len(), 1);
    }

    #[test]
    fn boundary_powers_are_accepted() {
        let (mut controller, _states, _releases) = spy();
        controller.forward(0.0).unwrap();
        controller.forward(100.0).unwrap();
        assert_eq!(controller.state(), DriveState::Forward { power: 100.0 });
    }
}
