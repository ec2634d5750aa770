use clap::{Args, Subcommand};

use rclink_proto::Identity;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod drive;
pub mod listen;
pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the admission hub and relay frames between peers.
    Serve(ServeArgs),
    /// Connect with an identity and send one command frame.
    Send(SendArgs),
    /// Connect with an identity and print received frames.
    Listen(ListenArgs),
    /// Run the vehicle consumer: dispatch commands to actuators.
    Drive(DriveArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Drive(args) => drive::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

fn parse_identity(token: &str) -> Result<Identity, String> {
    Identity::from_token(token).map_err(|err| err.to_string())
}

/// Connection parameters shared by the client-side subcommands.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Remote host.
    #[arg(long, env = "SOCKET_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Remote port.
    #[arg(long, short = 'p', env = "SOCKET_PORT")]
    pub port: u16,

    /// Identity token presented in the handshake.
    #[arg(long, value_parser = parse_identity, default_value = "id_fake")]
    pub identity: Identity,

    /// Retries after the initial connection attempt.
    #[arg(long, default_value_t = 20)]
    pub retries: u32,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind.
    #[arg(long, env = "SOCKET_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind.
    #[arg(long, short = 'p', env = "SOCKET_PORT")]
    pub port: u16,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub conn: ConnectArgs,

    /// Command name followed by its parameters.
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,

    /// Skip vocabulary validation and send the message verbatim.
    #[arg(long)]
    pub raw: bool,

    /// Wait for one reply frame and print it.
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[command(flatten)]
    pub conn: ConnectArgs,

    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,

    /// Stop instead of reconnecting when the server goes away.
    #[arg(long)]
    pub no_reconnect: bool,
}

#[derive(Args, Debug)]
pub struct DriveArgs {
    /// Remote host.
    #[arg(long, env = "SOCKET_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Remote port.
    #[arg(long, short = 'p', env = "SOCKET_PORT")]
    pub port: u16,

    /// Retries after the initial connection attempt.
    #[arg(long, default_value_t = 20)]
    pub retries: u32,

    /// Stop instead of reconnecting when the server goes away.
    #[arg(long)]
    pub no_reconnect: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
