//! One worker: a dedicated OS thread parking a single-threaded Tokio
//! runtime, which owns a `JoinSet` of per-connection tasks fed by this
//! worker's half of the dispatcher's channel (§4.5, §4.5.1).
//!
//! Blocking work inside a connection's handler invocation (a `/proc`
//! read, waiting on `perf record`) runs synchronously on this thread —
//! it stalls only this worker, never the others, matching §5.

use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::connection::{handle_connection, ConnectionCtx};

pub fn run_worker(
    id: usize,
    mut inbox: UnboundedReceiver<(TcpStream, SocketAddr)>,
    ctx: Arc<ConnectionCtx>,
    cancel: CancellationToken,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_io().build() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(worker = id, error = %e, "failed to start worker runtime");
            return;
        }
    };

    runtime.block_on(async move {
        let mut tasks = JoinSet::new();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                admission = inbox.recv() => {
                    match admission {
                        Some((stream, addr)) => spawn_connection(&mut tasks, stream, addr, ctx.clone()),
                        None => break,
                    }
                }
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        debug!(worker = id, pending = tasks.len(), "worker draining in-flight connections");
        while tasks.join_next().await.is_some() {}
    });
}

fn spawn_connection(
    tasks: &mut JoinSet<()>,
    stream: TcpStream,
    addr: SocketAddr,
    ctx: Arc<ConnectionCtx>,
) {
    if let Err(e) = stream.set_nonblocking(true) {
        warn!(%addr, error = %e, "could not mark connection non-blocking, dropping");
        return;
    }
    let stream = match tokio::net::TcpStream::from_std(stream) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(%addr, error = %e, "failed to adopt connection into runtime, dropping");
            return;
        }
    };
    tasks.spawn(handle_connection(stream, addr, ctx));
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
