use std::time::Duration;

use rclink_proto::Command;
use rclink_session::{Clock, Session, StopHandle};
use tracing::{debug, info, warn};

/// One command is emitted per tick: 10 ticks per second.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Snapshot of the two drive triggers and their paired analog axes.
///
/// Axis values are in [-1,1], released-to-fully-pressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerState {
    pub left_pressed: bool,
    pub right_pressed: bool,
    pub left_axis: f32,
    pub right_axis: f32,
}

/// Seam over the physical input device.
///
/// `poll` returns the current trigger snapshot, or `None` once the device
/// is gone.
pub trait InputSource {
    fn poll(&mut self) -> Option<TriggerState>;
}

/// Linearly rescale an axis value from [-1,1] to [0,100].
///
/// Inputs outside [-1,1] clamp to the range edges, matching linear
/// interpolation on a bounded range.
pub fn rescale_axis(value: f32) -> f32 {
    (value.clamp(-1.0, 1.0) + 1.0) * 50.0
}

/// Map one trigger snapshot to the single command for this tick.
///
/// Precedence, evaluated in order: both triggers pressed is a conflict and
/// always maps to neutral — conflicting intents must stop the vehicle, not
/// average into accidental motion. Then left-only is backward, right-only
/// is forward, neither is neutral.
pub fn map_triggers(input: &TriggerState) -> Command {
    if input.left_pressed && input.right_pressed {
        Command::Neutral
    } else if input.left_pressed {
        Command::Backward {
            power: rescale_axis(input.left_axis),
        }
    } else if input.right_pressed {
        Command::Forward {
            power: rescale_axis(input.right_axis),
        }
    } else {
        Command::Neutral
    }
}

/// Producer tick loop: poll, map, send, sleep — one command per tick.
///
/// Repeated neutral frames are sent on purpose; re-asserting neutral
/// defends against a dropped frame leaving the vehicle moving. Send
/// failures are logged and the loop continues. Returns the number of
/// commands emitted, stopping on `stop` or when the source reports the
/// device gone.
pub fn pump<S: InputSource>(
    source: &mut S,
    session: &mut Session,
    clock: &dyn Clock,
    stop: &StopHandle,
) -> usize {
    info!("input pump started");
    let mut emitted = 0usize;

    while !stop.is_stopped() {
        let Some(input) = source.poll() else {
            info!("input source closed; pump stopping");
            break;
        };

        let command = map_triggers(&input);
        debug!(%command, "tick");
        if session.send_command(&command) {
            emitted += 1;
        } else {
            warn!(%command, "dropped command frame");
        }

        clock.sleep(TICK_INTERVAL);
    }

    info!(emitted, "input pump stopped");
    emitted
}
