mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rclink", version, about = "Remote-control command transport CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use rclink_proto::Identity;

    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "rclink",
            "send",
            "--port",
            "9000",
            "--identity",
            "id_joystick",
            "joy_forward",
            "50",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.conn.identity, Identity::Joystick);
                assert_eq!(args.message, vec!["joy_forward", "50"]);
            }
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn send_requires_a_message() {
        let err = Cli::try_parse_from(["rclink", "send", "--port", "9000"])
            .expect_err("missing message should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn rejects_unknown_identity_token() {
        let err = Cli::try_parse_from([
            "rclink",
            "listen",
            "--port",
            "9000",
            "--identity",
            "id_intruder",
        ])
        .expect_err("bad identity should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_listen_with_count_and_no_reconnect() {
        let cli = Cli::try_parse_from([
            "rclink",
            "listen",
            "--port",
            "9000",
            "--count",
            "3",
            "--no-reconnect",
        ])
        .expect("listen args should parse");

        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.count, Some(3));
                assert!(args.no_reconnect);
                assert_eq!(args.conn.identity, Identity::Fake);
            }
            other => panic!("expected listen, got {other:?}"),
        }
    }

    #[test]
    fn parses_drive_subcommand() {
        let cli = Cli::try_parse_from(["rclink", "drive", "--port", "9000", "--retries", "2"])
            .expect("drive args should parse");
        assert!(matches!(cli.command, Command::Drive(_)));
    }

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from(["rclink", "serve", "--host", "127.0.0.1", "--port", "9000"])
            .expect("serve args should parse");
        assert!(matches!(cli.command, Command::Serve(_)));
    }
}
