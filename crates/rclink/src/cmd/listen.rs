use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rclink_session::{Listener, Session, SessionConfig};

use crate::cmd::ListenArgs;
use crate::exit::{session_error, CliError, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let mut config = SessionConfig::new(&args.conn.host, args.conn.port);
    config.retry.max_attempts = args.conn.retries;

    let mut session = Session::new(args.conn.identity, config);
    session
        .connect()
        .map_err(|err| session_error("connect failed", err))?;

    let listener = Listener::new(session).with_reconnect(!args.no_reconnect);
    let stop = listener.stop_handle();
    install_ctrlc_handler(stop.clone())?;

    let identity = args.conn.identity;
    let printed = Arc::new(AtomicUsize::new(0));

    listener
        .run(move |frame| {
            print_message(frame, identity.token(), format);
            let total = printed.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(count) = args.count {
                if total >= count {
                    stop.stop();
                }
            }
        })
        .map_err(|err| session_error("listen failed", err))?;

    Ok(SUCCESS)
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
