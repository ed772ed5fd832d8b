//! `lingofy status` - check that the server is reachable.

use std::io::Write;

use lingofy_studio::HttpBackend;

use super::CliError;

/// Query the server's status endpoint and print its message.
///
/// # Errors
///
/// Returns an error if the server is unreachable or answers with a failure.
pub async fn run(backend: &HttpBackend, out: &mut impl Write) -> Result<(), CliError> {
    let status = backend.status().await?;
    tracing::debug!(base_url = %backend.base_url(), "server is up");
    writeln!(out, "{}", status.message).map_err(CliError::Output)
}
