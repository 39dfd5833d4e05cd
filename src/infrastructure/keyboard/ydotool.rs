//! Ydotool daemon socket keyboard
//!
//! Speaks ydotoold's wire protocol directly instead of going through the
//! `ydotool` client, so every key event and its timing is under our control.
//! Works on X11 and Wayland alike, but needs `ydotoold` running and usually
//! membership in the `input` group.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::application::ports::{KeyboardError, VirtualKeyboard};
use crate::domain::sequence::Token;

use super::event::InputEvent;
use super::keycodes::{char_code, function_key_code, shifted_base, special_key_code, KEY_LEFTSHIFT};

/// Relay bridging our stdin to the daemon's datagram socket
pub const RELAY_TOOL: &str = "nc";

/// Gap between a key event and its sync report
pub const SYNC_GAP: Duration = Duration::from_millis(12);

/// Pause around shift press/release
pub const SHIFT_SETTLE: Duration = Duration::from_millis(12);

/// Virtual keyboard writing `input_event` records to ydotoold.
///
/// The daemon listens on a UNIX datagram socket, which tokio cannot easily
/// feed from a byte stream, so an `nc -u --send-only -U <socket>` relay
/// forwards whatever we write to its stdin. The relay is owned exclusively by
/// this keyboard and stays up until [`VirtualKeyboard::close`].
pub struct YdotoolKeyboard<W = ChildStdin> {
    connection: Mutex<Connection<W>>,
}

struct Connection<W> {
    writer: Option<W>,
    relay: Option<Child>,
}

impl YdotoolKeyboard<ChildStdin> {
    /// Spawn the relay to the daemon socket at `socket_path`
    pub fn connect(socket_path: &Path) -> Result<Self, KeyboardError> {
        let mut command = Command::new(RELAY_TOOL);
        command.args(["-u", "--send-only", "-U"]).arg(socket_path);

        let keyboard = Self::spawn_relay(command)?;
        debug!(socket = %socket_path.display(), "connected to ydotoold");
        Ok(keyboard)
    }

    /// Start `command` as the relay and write records to its stdin
    pub(crate) fn spawn_relay(mut command: Command) -> Result<Self, KeyboardError> {
        let mut relay = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    KeyboardError::ToolNotFound(RELAY_TOOL.to_string())
                } else {
                    KeyboardError::RelaySpawn(e)
                }
            })?;

        let stdin = relay.stdin.take().ok_or_else(|| {
            KeyboardError::RelaySpawn(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "relay stdin is not piped",
            ))
        })?;

        debug!(pid = relay.id(), "started ydotool relay");

        Ok(Self {
            connection: Mutex::new(Connection {
                writer: Some(stdin),
                relay: Some(relay),
            }),
        })
    }
}

impl<W> YdotoolKeyboard<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Write records to an arbitrary sink instead of a relay process
    pub fn with_writer(writer: W) -> Self {
        Self {
            connection: Mutex::new(Connection {
                writer: Some(writer),
                relay: None,
            }),
        }
    }

    /// Take back the sink; `None` once closed
    pub fn into_writer(self) -> Option<W> {
        self.connection.into_inner().writer
    }
}

#[async_trait]
impl<W> VirtualKeyboard for YdotoolKeyboard<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn type_tokens(
        &self,
        tokens: &[Token],
        key_delay: Duration,
    ) -> Result<(), KeyboardError> {
        let mut connection = self.connection.lock().await;
        let writer = connection.writer.as_mut().ok_or(KeyboardError::Closed)?;

        let mut emitter = Emitter { writer, key_delay };
        for token in tokens {
            emitter.token(token).await.map_err(KeyboardError::Transport)?;
        }
        emitter.writer.flush().await.map_err(KeyboardError::Transport)
    }

    async fn close(&self) -> Result<(), KeyboardError> {
        let mut connection = self.connection.lock().await;

        // Half-close first so the relay sees EOF after the last record
        let shutdown = match connection.writer.take() {
            Some(mut writer) => writer.shutdown().await,
            None => Ok(()),
        };

        if let Some(relay) = connection.relay.take() {
            terminate(relay).await;
        }

        shutdown.map_err(KeyboardError::Transport)
    }
}

/// Stop the relay and reap it
async fn terminate(mut relay: Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = relay.id() {
            if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                debug!("relay already gone: {}", e);
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = relay.start_kill();
    }

    match relay.wait().await {
        Ok(status) => debug!(%status, "ydotool relay exited"),
        Err(e) => debug!("failed to reap ydotool relay: {}", e),
    }
}

/// Turns tokens into paced event records for one `type_tokens` call
struct Emitter<'w, W> {
    writer: &'w mut W,
    key_delay: Duration,
}

impl<W> Emitter<'_, W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn token(&mut self, token: &Token) -> io::Result<()> {
        match token {
            Token::Text(text) => {
                for c in text.chars() {
                    self.character(c).await?;
                }
            }
            Token::Special(key) => self.tap(special_key_code(*key)).await?,
            Token::Function(n) => match function_key_code(*n) {
                Some(code) => self.tap(code).await?,
                None => trace!(n, "skipping out-of-range function key"),
            },
            Token::Delay(ms) => pause(Duration::from_millis(*ms)).await,
            Token::SetDelay(ms) => self.key_delay = Duration::from_millis(*ms),
            other => trace!(token = %other, "skipping token"),
        }
        Ok(())
    }

    async fn character(&mut self, c: char) -> io::Result<()> {
        if let Some(code) = char_code(c) {
            return self.tap(code).await;
        }

        match shifted_base(c).and_then(char_code) {
            Some(code) => {
                self.key(KEY_LEFTSHIFT, true).await?;
                pause(SHIFT_SETTLE).await;
                self.tap(code).await?;
                pause(SHIFT_SETTLE).await;
                self.key(KEY_LEFTSHIFT, false).await?;
                pause(SHIFT_SETTLE).await;
            }
            None => trace!("dropping character without key mapping"),
        }
        Ok(())
    }

    /// Press and release, each followed by the key delay
    async fn tap(&mut self, code: u16) -> io::Result<()> {
        self.key(code, true).await?;
        pause(self.key_delay).await;
        self.key(code, false).await?;
        pause(self.key_delay).await;
        Ok(())
    }

    async fn key(&mut self, code: u16, pressed: bool) -> io::Result<()> {
        trace!(code, pressed, "key event");
        self.write(InputEvent::key(code, pressed)).await?;
        pause(SYNC_GAP).await;
        self.write(InputEvent::sync()).await
    }

    async fn write(&mut self, event: InputEvent) -> io::Result<()> {
        self.writer.write_all(&event.to_bytes()).await?;
        self.writer.flush().await
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
