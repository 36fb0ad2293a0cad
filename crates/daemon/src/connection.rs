//! Per-connection state: drives the framing engine against bytes read off
//! one socket, evaluates each extracted request, and writes responses.
//!
//! A `Connection` is exclusively owned by the worker task that services
//! it (§3) — nothing here is shared across workers.

use std::net::SocketAddr;
use std::sync::Arc;

use introspectd_core::Limits;
use introspectd_wire::{ConnBuf, Frame, PendingRequest, Response};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace, warn};

use crate::{capture, Registry};

/// Shared, read-only context every connection on every worker needs.
pub struct ConnectionCtx {
    pub registry: Arc<Registry>,
    pub limits: Limits,
    pub debug: u8,
}

pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, ctx: Arc<ConnectionCtx>) {
    let mut conn_buf = ConnBuf::new(ctx.limits.max_conn_buffer);
    let (mut reader, mut writer) = stream.into_split();

    loop {
        loop {
            match conn_buf.try_extract() {
                Frame::Complete(value) => {
                    let response = evaluate(&value, &ctx);
                    if write_response(&mut writer, &response).await.is_err() {
                        debug!(%peer, "write failed, closing connection");
                        return;
                    }
                }
                Frame::Partial => break,
                Frame::Invalid => {
                    let _ = write_response(&mut writer, &Response::parse_error()).await;
                    debug!(%peer, "parse error, closing connection");
                    return;
                }
            }
        }

        if conn_buf.is_full() && !conn_buf.grow() {
            warn!(%peer, "connection buffer exceeded cap, closing with no response");
            return;
        }

        match reader.read(conn_buf.spare_capacity()).await {
            Ok(0) => {
                debug!(%peer, "peer closed connection");
                return;
            }
            Ok(n) => conn_buf.commit(n),
            Err(e) => {
                debug!(%peer, error = %e, "read failed, closing connection");
                return;
            }
        }
    }
}

fn evaluate(value: &serde_json::Value, ctx: &ConnectionCtx) -> Response {
    let request = match PendingRequest::from_value(value) {
        Ok(request) => request,
        Err(response) => return response,
    };

    if ctx.debug >= 1 {
        debug!(method = %request.method, "dispatching request");
    }
    if ctx.debug >= 2 {
        trace!(?request, "full request dump");
    }

    let Some(procedure) = ctx.registry.lookup(&request.method) else {
        return Response::method_not_found(request.id.clone());
    };

    let result = capture::invoke(procedure, &ctx.registry, &ctx.limits);
    let response = Response::result(request.id.clone(), result);

    if ctx.debug >= 2 {
        trace!(?response, "full response dump");
    }
    response
}

async fn write_response(
    writer: &mut tokio::net::tcp::OwnedWriteHalf,
    response: &Response,
) -> std::io::Result<()> {
    let bytes = response
        .to_bytes()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    writer.write_all(&bytes).await
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
