use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::live::LiveCommand;
use crate::model::{MatchPatch, TimelineEvent, TimelineEventKind};
use crate::state::{ChannelPhase, Delta, NoticeLevel};

/// Simulated push channel for running the dashboard without a backend. Emits
/// randomized partial updates for the subscribed match until shut down.
pub fn spawn_sim_channel(tx: Sender<Delta>, match_id: i64, cmd_rx: Receiver<LiveCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let _ = tx.send(Delta::ChannelPhase(ChannelPhase::Connected));
        let _ = tx.send(Delta::ChannelPhase(ChannelPhase::Subscribed));
        let _ = tx.send(Delta::Notice {
            level: NoticeLevel::Info,
            message: "Offline feed active: simulated match updates".to_string(),
        });

        let mut minute: u16 = rng.gen_range(1..20);
        let mut score = (0u32, 0u32);

        loop {
            let wait = Duration::from_millis(rng.gen_range(2000..5000));
            match cmd_rx.recv_timeout(wait) {
                Ok(LiveCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => return,
                Err(RecvTimeoutError::Timeout) => {}
            }

            minute = (minute + rng.gen_range(1..4)).min(90);
            let patch = random_patch(&mut rng, minute, &mut score);
            let _ = tx.send(Delta::LiveUpdate {
                id: match_id,
                patch,
            });
        }
    });
}

fn random_patch(rng: &mut impl Rng, minute: u16, score: &mut (u32, u32)) -> MatchPatch {
    let mut patch = MatchPatch::default();
    match rng.gen_range(0..10) {
        0..=2 => {
            if rng.gen_bool(0.5) {
                score.0 += 1;
            } else {
                score.1 += 1;
            }
            patch.score_team1 = Some(score.0);
            patch.score_team2 = Some(score.1);
            patch.event = Some(event(TimelineEventKind::Goal, minute, "Goal"));
        }
        3..=4 => {
            patch.event = Some(event(TimelineEventKind::YellowCard, minute, "Yellow card"));
        }
        5 => {
            patch.event = Some(event(TimelineEventKind::RedCard, minute, "Red card"));
        }
        6..=7 => {
            patch.event = Some(event(TimelineEventKind::Substitution, minute, "Substitution"));
        }
        _ => {
            patch.event = Some(event(TimelineEventKind::Other, minute, "Attempt on goal"));
        }
    }
    patch
}

fn event(kind: TimelineEventKind, minute: u16, description: &str) -> TimelineEvent {
    TimelineEvent {
        kind,
        minute,
        description: description.to_string(),
    }
}
