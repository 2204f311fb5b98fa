//! Client execution logic with connection retries.

use std::time::Duration;

use super::{error::ClientError, session::run_client_session};

const MAX_CONNECT_ATTEMPTS: u32 = 5;
const RETRY_INTERVAL_SECS: u64 = 5;

/// Run the chat client, retrying while the server cannot be reached
///
/// A session that ends because the server closed it (for example after an
/// idle timeout) is not retried.
pub async fn run_client(host: String, port: u16) -> Result<(), ClientError> {
    let addr = format!("{}:{}", host, port);
    let mut attempt = 1;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            addr,
            attempt,
            MAX_CONNECT_ATTEMPTS
        );

        match run_client_session(&addr).await {
            Ok(()) => {
                tracing::info!("Client session ended");
                return Ok(());
            }
            Err(e @ ClientError::ConnectFailed { .. }) if attempt < MAX_CONNECT_ATTEMPTS => {
                tracing::warn!("{}", e);
                tracing::info!(
                    "Retrying in {} seconds... (attempt {}/{})",
                    RETRY_INTERVAL_SECS,
                    attempt + 1,
                    MAX_CONNECT_ATTEMPTS
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_secs(RETRY_INTERVAL_SECS)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
