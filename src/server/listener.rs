use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{Instrument, error, info};

use crate::config::Config;
use crate::gopher::connection::Connection;

/// Pause after a failed accept so descriptor exhaustion doesn't spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let addr = cfg.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(
        "Listening on {} (root {}, presenting {}:{})",
        addr,
        cfg.root.display(),
        cfg.hostname,
        cfg.port
    );

    serve(listener, cfg).await
}

/// Accepts connections forever, one task per connection. Accept errors
/// are logged and the loop carries on.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "Accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        tracing::debug!("Accepted connection from {}", peer);

        let config = Arc::clone(&cfg);
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, config);
                if let Err(e) = conn.run().await {
                    tracing::warn!("Connection error: {}", e);
                }
            }
            .instrument(tracing::info_span!("conn", %peer)),
        );
    }
}
