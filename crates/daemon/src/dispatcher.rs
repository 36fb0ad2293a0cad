//! The accept loop (§4.5): a single dedicated OS thread that polls a
//! non-blocking listener and fans accepted sockets out to workers in
//! strict round-robin order.

use std::io::ErrorKind;
use std::net::TcpStream;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// How long the accept thread sleeps between non-blocking `accept()`
/// polls when there is nothing to accept. The listener has no readiness
/// notification of its own once off the tokio reactor, so this is a
/// plain poll loop — cheap enough at this interval for a control-plane
/// daemon.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs until `cancel` fires or a persistent accept error occurs.
/// `senders[i]` is worker `i`'s connection queue.
pub fn run_accept_loop(
    listener: std::net::TcpListener,
    senders: Vec<UnboundedSender<(TcpStream, std::net::SocketAddr)>>,
    cancel: CancellationToken,
) {
    let mut next_worker = 0usize;

    while !cancel.is_cancelled() {
        match listener.accept() {
            Ok((stream, addr)) => {
                if let Err(e) = stream.set_nonblocking(true) {
                    warn!(%addr, error = %e, "failed to set accepted socket non-blocking, dropping");
                    continue;
                }
                // round-robin (I5): every accepted connection advances
                // exactly one slot, regardless of which worker it lands on.
                let worker = next_worker % senders.len();
                next_worker = next_worker.wrapping_add(1);
                if senders[worker].send((stream, addr)).is_err() {
                    warn!(worker, "worker channel closed, dropping connection");
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                error!(error = %e, "persistent accept error, stopping accept loop");
                cancel.cancel();
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
