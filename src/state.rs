use std::collections::VecDeque;

use crate::form::{self, Form, FormModal};
use crate::model::{Match, MatchPatch, Player, Team, TimelineEventKind, merge_match_patch};

const NOTICE_CAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Admin,
    Live,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Teams,
    Matches,
    Players,
}

impl AdminTab {
    pub fn next(self) -> AdminTab {
        match self {
            AdminTab::Teams => AdminTab::Matches,
            AdminTab::Matches => AdminTab::Players,
            AdminTab::Players => AdminTab::Teams,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdminTab::Teams => "Teams",
            AdminTab::Matches => "Matches",
            AdminTab::Players => "Players",
        }
    }
}

/// Lifecycle of the push channel behind the live view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    Disconnected,
    Connected,
    Subscribed,
}

impl ChannelPhase {
    pub fn label(self) -> &'static str {
        match self {
            ChannelPhase::Disconnected => "offline",
            ChannelPhase::Connected => "connected",
            ChannelPhase::Subscribed => "live",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub minute: u16,
    pub kind: TimelineEventKind,
    pub description: String,
}

impl TimelineEntry {
    pub fn text(&self) -> String {
        format!("{}' {}", self.minute, self.description)
    }
}

/// State behind the live match view: the full snapshot plus the page-session
/// timeline, newest entry first.
#[derive(Debug)]
pub struct LiveView {
    pub match_id: i64,
    pub snapshot: Option<Match>,
    pub timeline: Vec<TimelineEntry>,
    pub phase: ChannelPhase,
}

impl LiveView {
    pub fn new(match_id: i64) -> Self {
        Self {
            match_id,
            snapshot: None,
            timeline: Vec::new(),
            phase: ChannelPhase::Disconnected,
        }
    }
}

#[derive(Debug)]
pub struct EditView {
    pub match_id: i64,
    pub title: String,
    pub form: Option<Form>,
}

impl EditView {
    pub fn new(match_id: i64) -> Self {
        Self {
            match_id,
            title: String::new(),
            form: None,
        }
    }
}

pub struct AppState {
    pub screen: Screen,
    pub admin_tab: AdminTab,
    // The public page and the admin page are independent controllers; they do
    // not share a match collection.
    pub browse: Vec<Match>,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub players: Vec<Player>,
    pub browse_selected: usize,
    pub team_selected: usize,
    pub match_selected: usize,
    pub player_selected: usize,
    pub live: Option<LiveView>,
    pub edit: Option<EditView>,
    pub modal: Option<FormModal>,
    pub notices: VecDeque<Notice>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Browse,
            admin_tab: AdminTab::Teams,
            browse: Vec::new(),
            teams: Vec::new(),
            matches: Vec::new(),
            players: Vec::new(),
            browse_selected: 0,
            team_selected: 0,
            match_selected: 0,
            player_selected: 0,
            live: None,
            edit: None,
            modal: None,
            notices: VecDeque::with_capacity(NOTICE_CAP),
            help_overlay: false,
        }
    }

    pub fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        if self.notices.len() >= NOTICE_CAP {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.back()
    }

    fn selection_mut(&mut self) -> (&mut usize, usize) {
        match self.screen {
            Screen::Admin => match self.admin_tab {
                AdminTab::Teams => (&mut self.team_selected, self.teams.len()),
                AdminTab::Matches => (&mut self.match_selected, self.matches.len()),
                AdminTab::Players => (&mut self.player_selected, self.players.len()),
            },
            _ => (&mut self.browse_selected, self.browse.len()),
        }
    }

    pub fn select_next(&mut self) {
        let (selected, total) = self.selection_mut();
        if total > 0 && *selected + 1 < total {
            *selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        let (selected, _) = self.selection_mut();
        *selected = selected.saturating_sub(1);
    }

    pub fn clamp_selections(&mut self) {
        self.browse_selected = self.browse_selected.min(self.browse.len().saturating_sub(1));
        self.team_selected = self.team_selected.min(self.teams.len().saturating_sub(1));
        self.match_selected = self.match_selected.min(self.matches.len().saturating_sub(1));
        self.player_selected = self
            .player_selected
            .min(self.players.len().saturating_sub(1));
    }

    pub fn selected_browse_match(&self) -> Option<&Match> {
        self.browse.get(self.browse_selected)
    }

    pub fn selected_admin_match(&self) -> Option<&Match> {
        self.matches.get(self.match_selected)
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.teams.get(self.team_selected)
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.players.get(self.player_selected)
    }
}

/// One-way messages from the worker threads into the UI state.
#[derive(Debug)]
pub enum Delta {
    SetBrowseMatches(Vec<Match>),
    SetTeams(Vec<Team>),
    SetMatches(Vec<Match>),
    SetPlayers(Vec<Player>),
    SetEditMatch(Match),
    SetLiveMatch(Match),
    LiveUpdate { id: i64, patch: MatchPatch },
    ChannelPhase(ChannelPhase),
    Notice { level: NoticeLevel, message: String },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetBrowseMatches(list) => {
            state.browse = list;
            state.clamp_selections();
        }
        Delta::SetTeams(list) => {
            // Team dropdowns in the create forms read this cache, so a
            // refresh while a modal is open re-populates its options.
            state.teams = list;
            state.clamp_selections();
            if let Some(modal) = &mut state.modal {
                form::refresh_team_options(modal, &state.teams);
            }
        }
        Delta::SetMatches(list) => {
            state.matches = list;
            state.clamp_selections();
        }
        Delta::SetPlayers(list) => {
            state.players = list;
            state.clamp_selections();
        }
        Delta::SetEditMatch(m) => {
            if let Some(edit) = &mut state.edit
                && edit.match_id == m.id
            {
                edit.title = format!("{} vs {}", m.team1_name(), m.team2_name());
                edit.form = Some(form::match_edit_form(&m));
            }
        }
        Delta::SetLiveMatch(m) => {
            if let Some(live) = &mut state.live
                && live.match_id == m.id
            {
                live.snapshot = Some(m);
            }
        }
        Delta::LiveUpdate { id, patch } => {
            if let Some(live) = &mut state.live
                && live.match_id == id
                && let Some(snapshot) = &mut live.snapshot
            {
                let changed = merge_match_patch(snapshot, &patch);
                if changed.event
                    && let Some(event) = patch.event
                {
                    live.timeline.insert(
                        0,
                        TimelineEntry {
                            minute: event.minute,
                            kind: event.kind,
                            description: event.description,
                        },
                    );
                }
            }
        }
        Delta::ChannelPhase(phase) => {
            if let Some(live) = &mut state.live {
                live.phase = phase;
            }
        }
        Delta::Notice { level, message } => {
            state.push_notice(level, message);
        }
    }
}
