use rclink_proto::Command;
use tracing::info;

use crate::actuator::{Actuator, DriveState, MotionController};
use crate::error::Result;

/// Steering slews at full power; the servo has no proportional command.
const STEER_POWER: f32 = 100.0;

/// The vehicle's managed actuators: two drive tracks and a steering servo.
///
/// Drive commands fan out to both tracks of the twin-motor chassis;
/// steering commands touch only the servo. Left steer is the servo's
/// reverse direction.
pub struct Vehicle {
    left: MotionController,
    right: MotionController,
    steering: MotionController,
}

impl Vehicle {
    pub fn new(
        left: Box<dyn Actuator>,
        right: Box<dyn Actuator>,
        steering: Box<dyn Actuator>,
    ) -> Self {
        Self {
            left: MotionController::new(left),
            right: MotionController::new(right),
            steering: MotionController::new(steering),
        }
    }

    /// Apply one decoded command.
    pub fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Forward { power } => {
                self.left.forward(*power)?;
                self.right.forward(*power)?;
            }
            Command::Backward { power } => {
                self.left.reverse(*power)?;
                self.right.reverse(*power)?;
            }
            Command::Neutral => {
                self.left.neutral();
                self.right.neutral();
            }
            Command::SteerLeft => self.steering.reverse(STEER_POWER)?,
            Command::SteerRight => self.steering.forward(STEER_POWER)?,
            Command::SteerNeutral => self.steering.neutral(),
            Command::Disconnect => {
                // Peer teardown: stop everything but keep the hardware
                // handles, so control can resume after a reconnect.
                info!("peer disconnect; all actuators to neutral");
                self.left.neutral();
                self.right.neutral();
                self.steering.neutral();
            }
        }
        Ok(())
    }

    /// Force every actuator to neutral and release hardware handles.
    pub fn exit(&mut self) {
        self.left.exit();
        self.right.exit();
        self.steering.exit();
    }

    pub fn left_state(&self) -> DriveState {
        self.left.state()
    }

    pub fn right_state(&self) -> DriveState {
        self.right.state()
    }

    pub fn steering_state(&self) -> DriveState {
        self.steering.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::NullActuator;

    fn vehicle() -> Vehicle {
        Vehicle::new(
            Box::new(NullActuator),
            Box::new(NullActuator),
            Box::new(NullActuator),
        )
    }

    #[test]
    fn drive_commands_fan_out_to_both_tracks() {
        let mut vehicle = vehicle();

        vehicle.apply(&Command::Forward { power: 50.0 }).unwrap();
        assert_eq!(vehicle.left_state(), DriveState::Forward { power: 50.0 });
        assert_eq!(vehicle.right_state(), DriveState::Forward { power: 50.0 });
        assert_eq!(vehicle.steering_state(), DriveState::Neutral);

        vehicle.apply(&Command::Backward { power: 20.0 }).unwrap();
        assert_eq!(vehicle.left_state(), DriveState::Reverse { power: 20.0 });
        assert_eq!(vehicle.right_state(), DriveState::Reverse { power: 20.0 });

        vehicle.apply(&Command::Neutral).unwrap();
        assert_eq!(vehicle.left_state(), DriveState::Neutral);
        assert_eq!(vehicle.right_state(), DriveState::Neutral);
    }

    #[test]
    fn steering_commands_leave_tracks_untouched() {
        let mut vehicle = vehicle();
        vehicle.apply(&Command::Forward { power: 70.0 }).unwrap();

        vehicle.apply(&Command::SteerLeft).unwrap();
        assert_eq!(
            vehicle.steering_state(),
            DriveState::Reverse { power: 100.0 }
        );
        assert_eq!(vehicle.left_state(), DriveState::Forward { power: 70.0 });

        vehicle.apply(&Command::SteerRight).unwrap();
        assert_eq!(
            vehicle.steering_state(),
            DriveState::Forward { power: 100.0 }
        );

        vehicle.apply(&Command::SteerNeutral).unwrap();
        assert_eq!(vehicle.steering_state(), DriveState::Neutral);
    }

    #[test]
    fn disconnect_stops_everything() {
        let mut vehicle = vehicle();
        vehicle.apply(&Command::Forward { power: 90.0 }).unwrap();
        vehicle.apply(&Command::SteerLeft).unwrap();

        vehicle.apply(&Command::Disconnect).unwrap();
        assert_eq!(vehicle.left_state(), DriveState::Neutral);
        assert_eq!(vehicle.right_state(), DriveState::Neutral);
        assert_eq!(vehicle.steering_state(), DriveState::Neutral);
    }

    #[test]
    fn out_of_range_power_is_surfaced() {
        let mut vehicle = vehicle();
        assert!(vehicle.apply(&Command::Forward { power: 120.0 }).is_err());
        assert_eq!(vehicle.left_state(), DriveState::Neutral);
    }

    #[test]
    fn exit_is_idempotent() {
        let mut vehicle = vehicle();
        vehicle.apply(&Command::Forward { power: 50.0 }).unwrap();
        vehicle.exit();
        vehicle.exit();
        assert_eq!(vehicle.left_state(), DriveState::Neutral);
    }
}
