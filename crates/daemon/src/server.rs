//! Server façade (§4.6): bind, register, run, stop, destroy.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::mpsc::unbounded_channel;
use tokio_util::sync::CancellationToken;
use tracing::info;

use introspectd_core::{DaemonError, Limits};

use crate::connection::ConnectionCtx;
use crate::registry::ProcedureKind;
use crate::{dispatcher, worker, Registry};

/// A bound, not-yet-running server. `Register` may still be called.
pub struct Server {
    listener: std::net::TcpListener,
    local_addr: SocketAddr,
    registry: Registry,
    limits: Limits,
    debug: u8,
    worker_count: usize,
}

/// A running server: `Stop` then drop to tear everything down in order
/// (§4.5's shutdown sequencing: signal, close listener's accept loop,
/// join workers, drop the registry).
pub struct RunningServer {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    accept_handle: std::thread::JoinHandle<()>,
    worker_handles: Vec<std::thread::JoinHandle<()>>,
}

impl Server {
    /// `Init(port)`: bind `0.0.0.0:port` non-blocking. `port == 0` lets
    /// the kernel choose; the resolved port is available via
    /// [`Server::local_addr`].
    pub fn init(port: u16, worker_count: usize, limits: Limits, debug: u8) -> Result<Server, DaemonError> {
        let addr: SocketAddr = ([0, 0, 0, 0], port).into();
        let listener =
            std::net::TcpListener::bind(addr).map_err(|e| DaemonError::BindFailed(addr, e))?;
        listener.set_nonblocking(true).map_err(|e| DaemonError::BindFailed(addr, e))?;
        let local_addr = listener.local_addr().map_err(DaemonError::Io)?;

        Ok(Server {
            listener,
            local_addr,
            registry: Registry::new(),
            limits,
            debug,
            worker_count: worker_count.max(1),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `Register(proc...)`: proxies to the registry. Must be called
    /// before [`Server::run`].
    pub fn register(
        &mut self,
        name: &str,
        kind: ProcedureKind,
        closure: &str,
    ) -> Result<(), DaemonError> {
        self.registry.register(name, kind, closure)
    }

    /// Registers the standard catalogue (§4.1) on top of whatever has
    /// already been registered.
    pub fn register_standard_catalogue(&mut self) -> Result<(), DaemonError> {
        for (name, kind, closure) in crate::registry::standard_catalogue() {
            self.registry.register(name, kind, closure)?;
        }
        Ok(())
    }

    /// `Run()`: freezes the registry, starts the worker pool, and spawns
    /// the accept loop on its own thread.
    pub fn run(self) -> RunningServer {
        let mut registry = self.registry;
        registry.freeze();
        let registry = Arc::new(registry);

        let ctx = Arc::new(ConnectionCtx { registry, limits: self.limits, debug: self.debug });
        let cancel = CancellationToken::new();

        let mut senders = Vec::with_capacity(self.worker_count);
        let mut worker_handles = Vec::with_capacity(self.worker_count);
        for id in 0..self.worker_count {
            let (tx, rx) = unbounded_channel();
            senders.push(tx);
            let worker_ctx = ctx.clone();
            let worker_cancel = cancel.clone();
            worker_handles.push(std::thread::spawn(move || {
                worker::run_worker(id, rx, worker_ctx, worker_cancel)
            }));
        }

        info!(addr = %self.local_addr, workers = self.worker_count, "introspectd listening");

        let accept_cancel = cancel.clone();
        let listener = self.listener;
        let accept_handle =
            std::thread::spawn(move || dispatcher::run_accept_loop(listener, senders, accept_cancel));

        RunningServer { local_addr: self.local_addr, cancel, accept_handle, worker_handles }
    }
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `Stop()`: signals shutdown. Does not block; call [`Self::join`]
    /// (which doubles as `Destroy()` — the registry is dropped once the
    /// last `Arc<Registry>` clone, held by a worker's `ConnectionCtx`,
    /// goes out of scope) to wait for full teardown.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Joins the accept thread, then every worker thread, in that order
    /// (§4.5).
    pub fn join(self) {
        if self.accept_handle.join().is_err() {
            tracing::error!("accept thread panicked");
        }
        for handle in self.worker_handles {
            if handle.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
