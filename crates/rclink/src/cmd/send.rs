use rclink_proto::Command;
use rclink_session::{Session, SessionConfig};

use crate::cmd::SendArgs;
use crate::exit::{session_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_message, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let message = args.message.join(" ");
    if !args.raw {
        Command::parse(&message)
            .map_err(|err| CliError::new(USAGE, format!("not a known command: {err}")))?;
    }

    let mut config = SessionConfig::new(&args.conn.host, args.conn.port);
    config.retry.max_attempts = args.conn.retries;

    let mut session = Session::new(args.conn.identity, config);
    session
        .connect()
        .map_err(|err| session_error("connect failed", err))?;

    if !session.send(&message) {
        session.disconnect();
        return Err(CliError::new(FAILURE, "send failed"));
    }

    if args.wait {
        match session.recv_frame() {
            Ok(reply) => print_message(&reply, args.conn.identity.token(), format),
            Err(err) => {
                session.disconnect();
                return Err(session_error("receive failed", err));
            }
        }
    }

    session.disconnect();
    Ok(SUCCESS)
}
