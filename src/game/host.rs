//! Host game runtime boundary.
//!
//! The relay only needs one thing from the game: a way to show a line to
//! every connected client. Events flow the other way through
//! [`Forwarder::forward`](crate::bridge::forwarder::Forwarder::forward), which host
//! callbacks call directly.
//!
//! `ConsoleHost` is the stand-in runtime used by the binary: stdout plays
//! the role of the connected clients and stdin produces game events.
//! Stdin is read on its own OS thread. A blocking read there cannot be
//! cancelled, and it must not hold up runtime shutdown.

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::common::OutboundEvent;

/// Name used for lines typed at the console that are not commands.
pub const SERVER_NAME: &str = "Server";

/// Broadcast primitive provided by the host runtime.
pub trait GameHost: Send + Sync {
    /// Send `text` to every connected client.
    fn broadcast(&self, text: &str);
}

/// Host that treats stdout as the set of connected clients.
#[derive(Debug, Default)]
pub struct ConsoleHost;

impl GameHost for ConsoleHost {
    fn broadcast(&self, text: &str) {
        println!("{}", text);
    }
}

/// Parse one console line into a game event.
///
/// - `/join <name>`
/// - `/leave <name> [reason]`
/// - `/say <name> <text>`
/// - anything else is a server message from [`SERVER_NAME`]
pub fn parse_console_line(line: &str) -> Option<OutboundEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Some(OutboundEvent::server_message(SERVER_NAME, line));
    };

    let (command, args) = rest.split_once(' ').unwrap_or((rest, ""));
    let args = args.trim();
    let (name, tail) = args.split_once(' ').unwrap_or((args, ""));
    let tail = tail.trim();

    match command.to_lowercase().as_str() {
        "join" if !name.is_empty() => Some(OutboundEvent::join(name)),
        "leave" if !name.is_empty() => Some(OutboundEvent::leave(name, tail)),
        "say" if !name.is_empty() && !tail.is_empty() => Some(OutboundEvent::chat(name, tail)),
        _ => {
            debug!("Ignoring unknown console command: {}", line);
            None
        }
    }
}

/// Read game events from `input` on a detached thread until EOF.
///
/// The thread is never joined by the relay; it ends with the process if
/// the input stays open.
pub fn spawn_console_reader<R, F>(input: R, on_event: F) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
    F: FnMut(OutboundEvent) + Send + 'static,
{
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || read_console(input, on_event))
}

fn read_console<R: BufRead>(input: R, mut on_event: impl FnMut(OutboundEvent)) {
    for line in input.lines() {
        match line {
            Ok(line) => {
                if let Some(event) = parse_console_line(&line) {
                    on_event(event);
                }
            }
            Err(e) => {
                debug!("Console read error: {}", e);
                break;
            }
        }
    }

    info!("Console input closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use std::sync::mpsc;
    use std::time::Duration;

    use crate::common::EventKind;

    /// Input that blocks until its sender is dropped, like an idle terminal.
    struct IdleInput(mpsc::Receiver<()>);

    impl Read for IdleInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[test]
    fn test_plain_line_is_server_message() {
        let event = parse_console_line("  restarting in 5 minutes ").unwrap();
        assert_eq!(event.kind, EventKind::ServerMessage);
        assert_eq!(event.display_name, SERVER_NAME);
        assert_eq!(event.text, "restarting in 5 minutes");
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_console_line("/join Bob"), Some(OutboundEvent::join("Bob")));
        assert_eq!(
            parse_console_line("/leave Bob Disconnected by user"),
            Some(OutboundEvent::leave("Bob", "Disconnected by user"))
        );
        assert_eq!(
            parse_console_line("/say Bob hello there"),
            Some(OutboundEvent::chat("Bob", "hello there"))
        );
    }

    #[test]
    fn test_invalid_lines_are_ignored() {
        assert_eq!(parse_console_line(""), None);
        assert_eq!(parse_console_line("/join"), None);
        assert_eq!(parse_console_line("/say Bob"), None);
        assert_eq!(parse_console_line("/kick Bob"), None);
    }

    #[test]
    fn test_console_reader_forwards_until_eof() {
        let input = Cursor::new("/join Bob\n\n/kick Bob\nback soon\n");
        let (tx, rx) = mpsc::channel();

        let reader = spawn_console_reader(input, move |event| {
            tx.send(event).unwrap();
        })
        .unwrap();
        reader.join().unwrap();

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                OutboundEvent::join("Bob"),
                OutboundEvent::server_message(SERVER_NAME, "back soon"),
            ]
        );
    }

    #[test]
    fn test_idle_console_does_not_block_runtime_shutdown() {
        let (hold_open, idle) = mpsc::channel::<()>();
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let reader = runtime.block_on(async {
            spawn_console_reader(io::BufReader::new(IdleInput(idle)), |_| {}).unwrap()
        });

        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || {
            drop(runtime);
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(2)).is_ok());
        assert!(!reader.is_finished());

        drop(hold_open);
        reader.join().unwrap();
    }
}
