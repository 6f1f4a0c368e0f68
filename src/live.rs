use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, connect};

use crate::model::MatchPatch;
use crate::sim_feed;
use crate::state::{ChannelPhase, Delta, NoticeLevel};

const READ_POLL: Duration = Duration::from_millis(400);

/// Commands into the channel thread. Shutdown sends the unsubscribe frame and
/// closes the socket; dropping the handle has the same effect.
#[derive(Debug)]
pub enum LiveCommand {
    Shutdown,
}

pub struct LiveHandle {
    tx: Sender<LiveCommand>,
}

impl LiveHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(LiveCommand::Shutdown);
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
enum ServerEvent {
    MatchUpdate(MatchPatch),
    Subscribed {
        #[serde(default)]
        message: Option<String>,
    },
    Error {
        message: String,
    },
}

fn subscribe_frame(match_id: i64) -> String {
    serde_json::json!({"event": "subscribe", "data": {"match_id": match_id}}).to_string()
}

fn unsubscribe_frame(match_id: i64) -> String {
    serde_json::json!({"event": "unsubscribe", "data": {"match_id": match_id}}).to_string()
}

/// Opens the push channel for one match on a dedicated thread. With
/// `MATCHDAY_OFFLINE=1` a simulated feed stands in for the websocket.
pub fn spawn_channel(tx: Sender<Delta>, match_id: i64, ws_url: String) -> LiveHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    if std::env::var("MATCHDAY_OFFLINE").map(|v| v == "1").unwrap_or(false) {
        sim_feed::spawn_sim_channel(tx, match_id, cmd_rx);
    } else {
        thread::spawn(move || run_channel(&tx, match_id, &ws_url, &cmd_rx));
    }
    LiveHandle { tx: cmd_tx }
}

fn run_channel(tx: &Sender<Delta>, match_id: i64, ws_url: &str, cmd_rx: &Receiver<LiveCommand>) {
    let _ = tx.send(Delta::ChannelPhase(ChannelPhase::Disconnected));

    let (mut socket, _) = match connect(ws_url) {
        Ok(pair) => pair,
        Err(err) => {
            notify(tx, NoticeLevel::Error, format!("Failed to open match channel: {err}"));
            return;
        }
    };
    let _ = tx.send(Delta::ChannelPhase(ChannelPhase::Connected));

    // Short read timeout so the loop can notice a pending shutdown.
    if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
        let _ = stream.set_read_timeout(Some(READ_POLL));
    }

    if let Err(err) = socket.send(Message::Text(subscribe_frame(match_id))) {
        notify(tx, NoticeLevel::Error, format!("Failed to subscribe to match: {err}"));
        return;
    }
    let _ = tx.send(Delta::ChannelPhase(ChannelPhase::Subscribed));

    loop {
        match cmd_rx.try_recv() {
            Ok(LiveCommand::Shutdown) | Err(TryRecvError::Disconnected) => {
                let _ = socket.send(Message::Text(unsubscribe_frame(match_id)));
                let _ = socket.close(None);
                return;
            }
            Err(TryRecvError::Empty) => {}
        }

        match socket.read() {
            Ok(Message::Text(raw)) => handle_frame(tx, match_id, &raw),
            Ok(Message::Close(_)) => {
                let _ = tx.send(Delta::ChannelPhase(ChannelPhase::Disconnected));
                notify(tx, NoticeLevel::Info, "Match channel closed by server");
                return;
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(err))
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) => {}
            Err(err) => {
                // Reconnection is the transport's concern; this one has none,
                // so the view stays degraded until it is reopened.
                let _ = tx.send(Delta::ChannelPhase(ChannelPhase::Disconnected));
                notify(tx, NoticeLevel::Error, format!("Match channel dropped: {err}"));
                return;
            }
        }
    }
}

fn handle_frame(tx: &Sender<Delta>, match_id: i64, raw: &str) {
    match serde_json::from_str::<ServerEvent>(raw) {
        Ok(ServerEvent::MatchUpdate(patch)) => {
            let _ = tx.send(Delta::LiveUpdate {
                id: match_id,
                patch,
            });
        }
        Ok(ServerEvent::Subscribed { message }) => {
            notify(
                tx,
                NoticeLevel::Info,
                message.unwrap_or_else(|| "Subscribed to match updates".to_string()),
            );
        }
        Ok(ServerEvent::Error { message }) => notify(tx, NoticeLevel::Error, message),
        Err(err) => notify(tx, NoticeLevel::Info, format!("Ignoring channel frame: {err}")),
    }
}

fn notify(tx: &Sender<Delta>, level: NoticeLevel, message: impl Into<String>) {
    let _ = tx.send(Delta::Notice {
        level,
        message: message.into(),
    });
}
