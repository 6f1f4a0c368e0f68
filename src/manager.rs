use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{self, ApiClient, ApiError};
use crate::model::{Match, Player, Team, sort_newest_first};
use crate::state::{Delta, NoticeLevel};

/// Capability record a concrete manager supplies: the resource endpoint plus
/// the noun used in failure notices.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSpec {
    pub endpoint: &'static str,
    pub noun: &'static str,
}

/// Generic CRUD manager over one backend resource. Holds the last fetched
/// collection; every mutation round-trips through a fresh `list` so the
/// rendered table always reflects server state. Failures are notified once at
/// this boundary and never propagate to callers.
pub struct CrudManager<R> {
    spec: ResourceSpec,
    publish: fn(Vec<R>) -> Delta,
    items: Vec<R>,
}

impl<R: DeserializeOwned + Clone> CrudManager<R> {
    pub fn new(spec: ResourceSpec, publish: fn(Vec<R>) -> Delta) -> Self {
        Self {
            spec,
            publish,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Fetch and publish the collection. On failure the held collection stays
    /// as-is and an empty vector comes back.
    pub fn list(&mut self, api: &ApiClient, tx: &Sender<Delta>) -> Vec<R> {
        match api.list::<R>(self.spec.endpoint) {
            Ok(data) => {
                self.items = data.clone();
                let _ = tx.send((self.publish)(data));
                self.items.clone()
            }
            Err(err) => {
                notify_error(tx, "fetch data", &err);
                Vec::new()
            }
        }
    }

    pub fn create(&mut self, api: &ApiClient, tx: &Sender<Delta>, payload: &Value, success: &str) {
        match api.create(self.spec.endpoint, payload) {
            Ok(()) => {
                notify(tx, NoticeLevel::Success, success);
                self.list(api, tx);
            }
            Err(err) => notify_error(tx, &format!("create {}", self.spec.noun), &err),
        }
    }

    pub fn update(
        &mut self,
        api: &ApiClient,
        tx: &Sender<Delta>,
        id: i64,
        payload: &Value,
        success: &str,
    ) {
        match api.update(self.spec.endpoint, id, payload) {
            Ok(()) => {
                notify(tx, NoticeLevel::Success, success);
                self.list(api, tx);
            }
            Err(err) => notify_error(tx, &format!("update {}", self.spec.noun), &err),
        }
    }

    pub fn remove(&mut self, api: &ApiClient, tx: &Sender<Delta>, id: i64, success: &str) {
        match api.remove(self.spec.endpoint, id) {
            Ok(()) => {
                notify(tx, NoticeLevel::Success, success);
                self.list(api, tx);
            }
            Err(err) => notify_error(tx, &format!("delete {}", self.spec.noun), &err),
        }
    }
}

pub const TEAMS_SPEC: ResourceSpec = ResourceSpec {
    endpoint: api::TEAMS,
    noun: "team",
};
pub const MATCHES_SPEC: ResourceSpec = ResourceSpec {
    endpoint: api::MATCHES,
    noun: "match",
};
pub const PLAYERS_SPEC: ResourceSpec = ResourceSpec {
    endpoint: api::PLAYERS,
    noun: "player",
};

/// Work the UI thread hands to the backend worker.
#[derive(Debug)]
pub enum BackendCommand {
    RefreshAll,
    RefreshBrowse,
    RefreshTeams,
    RefreshMatches,
    RefreshPlayers,
    CreateTeam(Value),
    DeleteTeam(i64),
    CreateMatch(Value),
    CreatePlayer(Value),
    UpdatePlayer { id: i64, payload: Value },
    DeletePlayer(i64),
    LoadEditMatch(i64),
    LoadLiveMatch(i64),
    SubmitMatchEdit { id: i64, payload: Value },
}

/// Backend worker thread: owns the HTTP client and the three CRUD managers,
/// drains commands, and answers with deltas. All blocking I/O lives here so
/// the UI loop never stalls.
pub fn spawn_backend(
    tx: Sender<Delta>,
    rx: Receiver<BackendCommand>,
    api: ApiClient,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut teams = CrudManager::<Team>::new(TEAMS_SPEC, Delta::SetTeams);
        let mut matches = CrudManager::<Match>::new(MATCHES_SPEC, Delta::SetMatches);
        let mut players = CrudManager::<Player>::new(PLAYERS_SPEC, Delta::SetPlayers);

        while let Ok(cmd) = rx.recv() {
            match cmd {
                BackendCommand::RefreshAll => {
                    teams.list(&api, &tx);
                    matches.list(&api, &tx);
                    players.list(&api, &tx);
                    refresh_browse(&api, &tx);
                }
                BackendCommand::RefreshBrowse => refresh_browse(&api, &tx),
                BackendCommand::RefreshTeams => {
                    teams.list(&api, &tx);
                }
                BackendCommand::RefreshMatches => {
                    matches.list(&api, &tx);
                }
                BackendCommand::RefreshPlayers => {
                    players.list(&api, &tx);
                }
                BackendCommand::CreateTeam(payload) => {
                    teams.create(&api, &tx, &payload, "Team created successfully");
                }
                BackendCommand::DeleteTeam(id) => {
                    teams.remove(&api, &tx, id, "Team deleted successfully");
                }
                BackendCommand::CreateMatch(payload) => {
                    matches.create(&api, &tx, &payload, "Match created successfully");
                }
                BackendCommand::CreatePlayer(payload) => {
                    players.create(&api, &tx, &payload, "Player created successfully");
                }
                BackendCommand::UpdatePlayer { id, payload } => {
                    players.update(&api, &tx, id, &payload, "Player updated successfully");
                }
                BackendCommand::DeletePlayer(id) => {
                    players.remove(&api, &tx, id, "Player deleted successfully");
                }
                BackendCommand::LoadEditMatch(id) => match api.get_one::<Match>(api::MATCHES, id) {
                    Ok(m) => {
                        let _ = tx.send(Delta::SetEditMatch(m));
                    }
                    Err(err) => notify_error(&tx, "load match data", &err),
                },
                BackendCommand::LoadLiveMatch(id) => match api.get_one::<Match>(api::MATCHES, id) {
                    Ok(m) => {
                        let _ = tx.send(Delta::SetLiveMatch(m));
                    }
                    Err(err) => notify_error(&tx, "load match data", &err),
                },
                BackendCommand::SubmitMatchEdit { id, payload } => {
                    match api.update(api::MATCHES, id, &payload) {
                        Ok(()) => {
                            notify(&tx, NoticeLevel::Success, "Match updated successfully");
                            // Reload so the form reflects authoritative state.
                            match api.get_one::<Match>(api::MATCHES, id) {
                                Ok(m) => {
                                    let _ = tx.send(Delta::SetEditMatch(m));
                                }
                                Err(err) => notify_error(&tx, "load match data", &err),
                            }
                            matches.list(&api, &tx);
                        }
                        Err(err) => notify_error(&tx, "update match", &err),
                    }
                }
            }
        }
    })
}

/// Read-only listing for the public cards: fetch once, newest first. No
/// mutation operations exist on this path.
fn refresh_browse(api: &ApiClient, tx: &Sender<Delta>) {
    match api.list::<Match>(api::MATCHES) {
        Ok(mut list) => {
            sort_newest_first(&mut list);
            let _ = tx.send(Delta::SetBrowseMatches(list));
        }
        Err(err) => notify_error(tx, "fetch matches", &err),
    }
}

fn notify(tx: &Sender<Delta>, level: NoticeLevel, message: impl Into<String>) {
    let _ = tx.send(Delta::Notice {
        level,
        message: message.into(),
    });
}

pub(crate) fn notify_error(tx: &Sender<Delta>, context: &str, err: &ApiError) {
    let _ = tx.send(Delta::Notice {
        level: NoticeLevel::Error,
        message: format!("Failed to {context}: {err}"),
    });
}
