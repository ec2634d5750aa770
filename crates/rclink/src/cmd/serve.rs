use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rclink_session::{CommandSender, Hub, HubPeer, SessionError};
use tracing::{info, warn};

use crate::cmd::ServeArgs;
use crate::exit::{session_error, CliError, CliResult, SUCCESS};
use crate::output::OutputFormat;

const RELAY_WAIT_TIMEOUT: Duration = Duration::from_millis(500);

type PeerMap = Arc<Mutex<HashMap<u64, CommandSender>>>;

pub fn run(args: ServeArgs, _format: OutputFormat) -> CliResult<i32> {
    let hub = Hub::bind(&args.host, args.port)
        .map_err(|err| session_error("bind failed", err))?
        .with_wait_timeout(RELAY_WAIT_TIMEOUT);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let peers: PeerMap = Arc::new(Mutex::new(HashMap::new()));
    let mut next_id = 0u64;

    while running.load(Ordering::SeqCst) {
        let peer = match hub.accept() {
            Ok(peer) => peer,
            Err(SessionError::UnknownIdentity(token)) => {
                warn!(%token, "rejected connection");
                continue;
            }
            Err(err) => return Err(session_error("accept failed", err)),
        };

        let id = next_id;
        next_id += 1;

        let sender = peer
            .sender()
            .map_err(|err| session_error("sender split failed", err))?;
        peers.lock().expect("peer map lock").insert(id, sender);

        let peers_for_relay = peers.clone();
        let running_for_relay = running.clone();
        std::thread::spawn(move || relay_loop(peer, id, peers_for_relay, running_for_relay));
    }

    Ok(SUCCESS)
}

/// Forward every frame from one peer to all other connected peers.
fn relay_loop(mut peer: HubPeer, id: u64, peers: PeerMap, running: Arc<AtomicBool>) {
    let identity = peer.identity();
    info!(%identity, "relay started");

    while running.load(Ordering::SeqCst) {
        let frames = match peer.recv_available() {
            Ok(frames) => frames,
            Err(err) => {
                info!(%identity, error = %err, "peer left");
                break;
            }
        };

        for frame in &frames {
            let mut peers = peers.lock().expect("peer map lock");
            for (other_id, sender) in peers.iter_mut() {
                if *other_id == id {
                    continue;
                }
                // A failed send means that peer is dying; its own relay
                // loop notices and removes it.
                let _ = sender.send(frame);
            }
        }
    }

    peers.lock().expect("peer map lock").remove(&id);
    info!(%identity, "relay stopped");
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
