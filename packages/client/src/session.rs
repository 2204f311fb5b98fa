//! One connection to the chat server.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
    sync::mpsc,
};

use crate::{
    error::ClientError,
    ui::{PROMPT, print_server_line},
};

/// Run one chat session until the server closes the connection or the user exits
///
/// Server lines are printed as they arrive; every non-empty input line is sent
/// as-is, so commands such as `who` or `to|Bob|hi` pass straight through.
pub async fn run_client_session(addr: &str) -> Result<(), ClientError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| ClientError::ConnectFailed {
            addr: addr.to_string(),
            source,
        })?;

    tracing::info!("Connected to chat server at {}", addr);
    println!(
        "\nCommands: who | rename|<name> | to|<name>|<message>. Press Ctrl+C to exit.\n"
    );

    let (reader, writer) = stream.into_split();

    // Spawn a task to print incoming lines
    let mut read_task = tokio::spawn(read_loop(reader));

    // Create channel for rustyline input
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                        if input_tx.send(line).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to send typed lines to the server
    let mut write_task = tokio::spawn(write_loop(input_rx, writer));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            match read_result {
                Ok(result) => result?,
                Err(e) => tracing::warn!("Read task failed: {}", e),
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            match write_result {
                Ok(result) => result?,
                Err(e) => tracing::warn!("Write task failed: {}", e),
            }
        }
    }

    Ok(())
}

/// Print every line from the server until it closes the connection
async fn read_loop<R>(reader: R) -> Result<(), ClientError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        print_server_line(&line);
    }
    println!();
    tracing::info!("Server closed the connection");
    Ok(())
}

/// Send every queued input line, newline-terminated, until the input ends
async fn write_loop<W>(
    mut input: mpsc::UnboundedReceiver<String>,
    mut writer: W,
) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = input.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    writer.shutdown().await?;
    Ok(())
}
