use rclink_control::{LogActuator, PinConfig, Vehicle};
use rclink_proto::{Command, Identity};
use rclink_session::{Listener, Session, SessionConfig};
use tracing::{info, warn};

use crate::cmd::DriveArgs;
use crate::exit::{session_error, CliError, CliResult, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: DriveArgs, _format: OutputFormat) -> CliResult<i32> {
    // Pin assignments feed the hardware layer behind the Actuator seam;
    // without them the vehicle runs with log-only actuators.
    match PinConfig::from_env() {
        Ok(pins) => info!(?pins, "pin assignments loaded"),
        Err(err) => info!(%err, "no pin assignments; running with log actuators"),
    }

    let mut vehicle = Vehicle::new(
        Box::new(LogActuator::new("left-track")),
        Box::new(LogActuator::new("right-track")),
        Box::new(LogActuator::new("steering")),
    );

    let mut config = SessionConfig::new(&args.host, args.port);
    config.retry.max_attempts = args.retries;

    let mut session = Session::new(Identity::Vehicle, config);
    session
        .connect()
        .map_err(|err| session_error("connect failed", err))?;

    let listener = Listener::new(session).with_reconnect(!args.no_reconnect);
    let stop = listener.stop_handle();
    install_ctrlc_handler(stop)?;

    let result = listener.run(|frame| dispatch(frame, &mut vehicle));

    // Always park the actuators, even when the listener died on an error.
    vehicle.exit();

    result.map_err(|err| session_error("drive failed", err))?;
    Ok(SUCCESS)
}

fn dispatch(frame: &str, vehicle: &mut Vehicle) {
    let command = match Command::parse(frame) {
        Ok(command) => command,
        Err(err) => {
            warn!(%frame, error = %err, "ignoring unparseable frame");
            return;
        }
    };

    if let Err(err) = vehicle.apply(&command) {
        // Upstream interpolation bug; report it loudly but keep driving.
        warn!(%command, error = %err, "rejected command");
    }
}

fn install_ctrlc_handler(stop: rclink_session::StopHandle) -> CliResult<()> {
    ctrlc::set_handler(move || {
        stop.stop();
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
