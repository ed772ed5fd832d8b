//! `lingofy chat` - talk to the assistant from the terminal.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use lingofy_studio::{CHAT_GREETING, ChatError, ChatTranscript, StudioBackend};

use super::CliError;

const PROMPT: &str = "> ";

/// Read questions line by line from `input` until EOF, `exit` or `quit`.
///
/// Failed turns print the apology left in the transcript and the
/// conversation continues.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub async fn run<R>(
    backend: &dyn StudioBackend,
    input: R,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
{
    let mut transcript = ChatTranscript::new();
    writeln!(out, "{CHAT_GREETING}").map_err(CliError::Output)?;

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}").map_err(CliError::Output)?;
        out.flush().map_err(CliError::Output)?;

        let Some(line) = lines.next_line().await.map_err(CliError::Output)? else {
            break;
        };
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }

        match transcript.send(backend, line).await {
            Ok(reply) => writeln!(out, "{}", reply.content).map_err(CliError::Output)?,
            Err(ChatError::EmptyMessage) => {}
            Err(ChatError::Backend(_)) => {
                if let Some(apology) = transcript.messages().last() {
                    writeln!(out, "{}", apology.content).map_err(CliError::Output)?;
                }
            }
        }
    }

    tracing::debug!(turns = transcript.history().len(), "chat ended");
    Ok(())
}
