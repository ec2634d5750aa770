use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use rclink_frame::{FrameReader, FrameWriter};
use rclink_proto::{tokens, Identity};
use rclink_session::{RetryPolicy, Session, SessionConfig};
use rclink_transport::LinkStream;

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("ephemeral bind should succeed")
        .local_addr()
        .expect("bound listener has an address")
        .port()
}

fn client_config(port: u16) -> SessionConfig {
    SessionConfig {
        retry: RetryPolicy {
            max_attempts: 0,
            delay: Duration::from_millis(10),
        },
        wait_timeout: Duration::from_secs(3),
        idle_pause: Duration::from_millis(1),
        ..SessionConfig::new("127.0.0.1", port)
    }
}

/// Keep trying to establish a session until the server is up.
fn wait_for_session(port: u16, identity: Identity, timeout: Duration) -> Session {
    let start = Instant::now();
    loop {
        let mut session = Session::new(identity, client_config(port));
        match session.connect() {
            Ok(()) => return session,
            Err(err) => {
                if start.elapsed() >= timeout {
                    panic!("connect timeout: {err}");
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

fn spawn_serve(port: u16) -> std::process::Child {
    Command::new(env!("CARGO_BIN_EXE_rclink"))
        .args([
            "--log-level",
            "error",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            &port.to_string(),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("serve command should start")
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_rclink"))
        .arg("version")
        .output()
        .expect("version command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    assert!(stdout.starts_with("rclink "));
}

#[test]
fn serve_relays_frames_between_admitted_peers() {
    let port = free_port();
    let mut child = spawn_serve(port);

    let mut vehicle = wait_for_session(port, Identity::Vehicle, Duration::from_secs(5));
    let mut joystick = wait_for_session(port, Identity::Joystick, Duration::from_secs(5));

    assert!(joystick.send("joy_forward 50"));
    assert_eq!(vehicle.recv_frame().expect("relay should deliver"), "joy_forward 50");

    joystick.disconnect();
    vehicle.disconnect();
    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn send_command_reaches_a_listening_session() {
    let port = free_port();
    let mut child = spawn_serve(port);

    let mut vehicle = wait_for_session(port, Identity::Vehicle, Duration::from_secs(5));

    let status = Command::new(env!("CARGO_BIN_EXE_rclink"))
        .args([
            "--log-level",
            "error",
            "send",
            "--host",
            "127.0.0.1",
            "--port",
            &port.to_string(),
            "--identity",
            "id_joystick",
            "--retries",
            "5",
            "joy_backward",
            "30",
        ])
        .status()
        .expect("send command should run");
    assert!(status.success());

    assert_eq!(
        vehicle.recv_frame().expect("frame should arrive"),
        "joy_backward 30"
    );

    vehicle.disconnect();
    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn serve_rejects_unknown_identity_tokens() {
    let port = free_port();
    let mut child = spawn_serve(port);

    // Raw client speaking the frame protocol with a bogus identity.
    let start = Instant::now();
    let stream = loop {
        match LinkStream::connect("127.0.0.1", port) {
            Ok(stream) => break stream,
            Err(err) => {
                if start.elapsed() >= Duration::from_secs(5) {
                    panic!("connect timeout: {err}");
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    };

    let read_half = stream.try_clone().expect("stream should clone");
    let mut reader = FrameReader::new(read_half);
    let mut writer = FrameWriter::new(stream);

    writer.send("id_bogus").expect("hello should send");
    assert_eq!(reader.read_frame().expect("reply should arrive"), tokens::ERR_UNKNOWN);

    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn send_validates_the_command_vocabulary() {
    // Validation happens before any connection attempt.
    let output = Command::new(env!("CARGO_BIN_EXE_rclink"))
        .args([
            "--log-level",
            "error",
            "send",
            "--port",
            "1",
            "joy_warp",
            "9000",
        ])
        .output()
        .expect("send command should run");

    assert_eq!(output.status.code(), Some(64));
}
