//! Forwarding of child process output
//!
//! Stdout and stderr of a child are both piped and relayed line by line to
//! our own stdout, so engine and build logs appear merged in one stream.
//! Bytes that are not valid UTF-8 are replaced rather than ending the relay,
//! since a closed pipe would kill the child with SIGPIPE.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;

use shared::{process_warn, ProcessId};

/// Take the child's pipes and spawn one relay task per stream
///
/// The tasks finish once the child closes its end of the pipe.
pub fn spawn_output_forwarders(child: &mut Child) -> Vec<JoinHandle<()>> {
    let mut forwarders = Vec::with_capacity(2);

    if let Some(stdout) = child.stdout.take() {
        forwarders.push(tokio::spawn(forward_lines(stdout)));
    }
    if let Some(stderr) = child.stderr.take() {
        forwarders.push(tokio::spawn(forward_lines(stderr)));
    }

    forwarders
}

async fn forward_lines<R>(stream: R)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => println!("{}", display_line(&buf)),
            Err(err) => {
                process_warn!(ProcessId::current(), "⚠️ Child output relay failed: {}", err);
                break;
            }
        }
    }
}

/// One line of raw output without its terminator, lossily decoded
fn display_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
