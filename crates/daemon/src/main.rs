use std::process::ExitCode;

use introspectd_daemon::{env, Server};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut server = match Server::init(env::port(), env::workers(), env::limits(), env::jrpc_debug()) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start introspectd");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.register_standard_catalogue() {
        tracing::error!(error = %e, "failed to register standard catalogue");
        return ExitCode::FAILURE;
    }

    let running = server.run();

    let signal_runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "failed to start shutdown-signal runtime");
            running.stop();
            running.join();
            return ExitCode::FAILURE;
        }
    };
    signal_runtime.block_on(async {
        let _ = tokio::signal::ctrl_c().await;
    });

    tracing::info!("shutdown signal received");
    running.stop();
    running.join();
    ExitCode::SUCCESS
}
