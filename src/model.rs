use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Wire timestamps come in datetime-local, ISO, and database flavors.
const WIRE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_wire_time(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim().trim_end_matches('Z');
    for fmt in WIRE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    None
}

pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    parse_wire_time(trimmed).map(|dt| dt.date())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Team {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub birth: Option<String>,
    pub position: PlayerPosition,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub appearances: u32,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub team: Option<Box<Team>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Player {
    pub fn team_name(&self) -> &str {
        self.team.as_deref().map(|t| t.name.as_str()).unwrap_or("Unassigned")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPosition {
    Goalkeeper,
    CentreBack,
    Sweeper,
    LeftBack,
    RightBack,
    LeftWingBack,
    RightWingBack,
    DefensiveMidfielder,
    CentralMidfielder,
    AttackingMidfielder,
    LeftMidfielder,
    RightMidfielder,
    LeftWinger,
    RightWinger,
    Striker,
    CentreForward,
    SecondStriker,
    FalseNine,
    LeftForward,
    RightForward,
    Playmaker,
    TargetMan,
    BoxToBoxMidfielder,
    InvertedWinger,
    Libero,
}

impl PlayerPosition {
    pub const ALL: [PlayerPosition; 25] = [
        PlayerPosition::Goalkeeper,
        PlayerPosition::CentreBack,
        PlayerPosition::Sweeper,
        PlayerPosition::LeftBack,
        PlayerPosition::RightBack,
        PlayerPosition::LeftWingBack,
        PlayerPosition::RightWingBack,
        PlayerPosition::DefensiveMidfielder,
        PlayerPosition::CentralMidfielder,
        PlayerPosition::AttackingMidfielder,
        PlayerPosition::LeftMidfielder,
        PlayerPosition::RightMidfielder,
        PlayerPosition::LeftWinger,
        PlayerPosition::RightWinger,
        PlayerPosition::Striker,
        PlayerPosition::CentreForward,
        PlayerPosition::SecondStriker,
        PlayerPosition::FalseNine,
        PlayerPosition::LeftForward,
        PlayerPosition::RightForward,
        PlayerPosition::Playmaker,
        PlayerPosition::TargetMan,
        PlayerPosition::BoxToBoxMidfielder,
        PlayerPosition::InvertedWinger,
        PlayerPosition::Libero,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            PlayerPosition::Goalkeeper => "goalkeeper",
            PlayerPosition::CentreBack => "centre_back",
            PlayerPosition::Sweeper => "sweeper",
            PlayerPosition::LeftBack => "left_back",
            PlayerPosition::RightBack => "right_back",
            PlayerPosition::LeftWingBack => "left_wing_back",
            PlayerPosition::RightWingBack => "right_wing_back",
            PlayerPosition::DefensiveMidfielder => "defensive_midfielder",
            PlayerPosition::CentralMidfielder => "central_midfielder",
            PlayerPosition::AttackingMidfielder => "attacking_midfielder",
            PlayerPosition::LeftMidfielder => "left_midfielder",
            PlayerPosition::RightMidfielder => "right_midfielder",
            PlayerPosition::LeftWinger => "left_winger",
            PlayerPosition::RightWinger => "right_winger",
            PlayerPosition::Striker => "striker",
            PlayerPosition::CentreForward => "centre_forward",
            PlayerPosition::SecondStriker => "second_striker",
            PlayerPosition::FalseNine => "false_nine",
            PlayerPosition::LeftForward => "left_forward",
            PlayerPosition::RightForward => "right_forward",
            PlayerPosition::Playmaker => "playmaker",
            PlayerPosition::TargetMan => "target_man",
            PlayerPosition::BoxToBoxMidfielder => "box_to_box_midfielder",
            PlayerPosition::InvertedWinger => "inverted_winger",
            PlayerPosition::Libero => "libero",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    NotStarted,
    Running,
    HalfTime,
    FullTime,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 4] = [
        MatchStatus::NotStarted,
        MatchStatus::Running,
        MatchStatus::HalfTime,
        MatchStatus::FullTime,
    ];

    pub fn from_wire(raw: &str) -> Option<MatchStatus> {
        match raw {
            "not_started" => Some(MatchStatus::NotStarted),
            "running" => Some(MatchStatus::Running),
            "half_time" => Some(MatchStatus::HalfTime),
            "full_time" => Some(MatchStatus::FullTime),
            _ => None,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            MatchStatus::NotStarted => "not_started",
            MatchStatus::Running => "running",
            MatchStatus::HalfTime => "half_time",
            MatchStatus::FullTime => "full_time",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::NotStarted => "Not Started",
            MatchStatus::Running => "Running",
            MatchStatus::HalfTime => "HT",
            MatchStatus::FullTime => "FT",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    #[serde(default)]
    pub team1_id: Option<i64>,
    #[serde(default)]
    pub team2_id: Option<i64>,
    #[serde(default)]
    pub score_team1: u32,
    #[serde(default)]
    pub score_team2: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub half_time: Option<String>,
    #[serde(default)]
    pub second_start: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub team1: Option<Team>,
    #[serde(default)]
    pub team2: Option<Team>,
    #[serde(default)]
    pub stats: Option<MatchStats>,
    #[serde(default)]
    pub tournament: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Match {
    pub fn status(&self) -> Option<MatchStatus> {
        MatchStatus::from_wire(&self.status)
    }

    pub fn team1_name(&self) -> &str {
        self.team1.as_ref().map(|t| t.name.as_str()).unwrap_or("TBA")
    }

    pub fn team2_name(&self) -> &str {
        self.team2.as_ref().map(|t| t.name.as_str()).unwrap_or("TBA")
    }

    pub fn tournament_label(&self) -> &str {
        self.tournament.as_deref().unwrap_or("League Match")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    #[serde(default)]
    pub possession_team1: u32,
    #[serde(default)]
    pub possession_team2: u32,
    #[serde(default)]
    pub shots_team1: u32,
    #[serde(default)]
    pub shots_team2: u32,
    #[serde(default)]
    pub shots_on_target_team1: u32,
    #[serde(default)]
    pub shots_on_target_team2: u32,
    #[serde(default)]
    pub corners_team1: u32,
    #[serde(default)]
    pub corners_team2: u32,
    #[serde(default)]
    pub yellow_cards_team1: u32,
    #[serde(default)]
    pub yellow_cards_team2: u32,
    #[serde(default)]
    pub red_cards_team1: u32,
    #[serde(default)]
    pub red_cards_team2: u32,
    #[serde(default)]
    pub fouls_team1: u32,
    #[serde(default)]
    pub fouls_team2: u32,
    #[serde(default)]
    pub offsides_team1: u32,
    #[serde(default)]
    pub offsides_team2: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatPair {
    pub label: &'static str,
    pub team1: u32,
    pub team2: u32,
    /// Possession is already a percentage and is shown as `<n>%` literals.
    pub percent: bool,
}

impl MatchStats {
    pub fn rows(&self) -> [StatPair; 8] {
        [
            StatPair {
                label: "Possession",
                team1: self.possession_team1,
                team2: self.possession_team2,
                percent: true,
            },
            StatPair {
                label: "Shots",
                team1: self.shots_team1,
                team2: self.shots_team2,
                percent: false,
            },
            StatPair {
                label: "Shots on Target",
                team1: self.shots_on_target_team1,
                team2: self.shots_on_target_team2,
                percent: false,
            },
            StatPair {
                label: "Corners",
                team1: self.corners_team1,
                team2: self.corners_team2,
                percent: false,
            },
            StatPair {
                label: "Yellow Cards",
                team1: self.yellow_cards_team1,
                team2: self.yellow_cards_team2,
                percent: false,
            },
            StatPair {
                label: "Red Cards",
                team1: self.red_cards_team1,
                team2: self.red_cards_team2,
                percent: false,
            },
            StatPair {
                label: "Fouls",
                team1: self.fouls_team1,
                team2: self.fouls_team2,
                percent: false,
            },
            StatPair {
                label: "Offsides",
                team1: self.offsides_team1,
                team2: self.offsides_team2,
                percent: false,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    Goal,
    YellowCard,
    RedCard,
    Substitution,
    #[serde(other)]
    Other,
}

impl TimelineEventKind {
    pub fn label(self) -> &'static str {
        match self {
            TimelineEventKind::Goal => "GOAL",
            TimelineEventKind::YellowCard => "YEL",
            TimelineEventKind::RedCard => "RED",
            TimelineEventKind::Substitution => "SUB",
            TimelineEventKind::Other => "EVT",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: TimelineEventKind,
    #[serde(rename = "time")]
    pub minute: u16,
    pub description: String,
}

/// Partial match update pushed over the live channel. Any subset of fields
/// may be present; absent fields leave the snapshot untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchPatch {
    #[serde(default)]
    pub score_team1: Option<u32>,
    #[serde(default)]
    pub score_team2: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stats: Option<MatchStats>,
    #[serde(default)]
    pub team1: Option<Team>,
    #[serde(default)]
    pub team2: Option<Team>,
    #[serde(default)]
    pub event: Option<TimelineEvent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangedFields {
    pub scores: bool,
    pub status: bool,
    pub stats: bool,
    pub teams: bool,
    pub event: bool,
}

impl ChangedFields {
    pub fn any(&self) -> bool {
        self.scores || self.status || self.stats || self.teams || self.event
    }
}

/// Shallow-merges a live patch into the held snapshot and reports which
/// display regions the patch touched. The timeline event itself is not part
/// of the snapshot; the caller owns the page-session timeline list.
pub fn merge_match_patch(snapshot: &mut Match, patch: &MatchPatch) -> ChangedFields {
    let mut changed = ChangedFields::default();
    if let Some(score) = patch.score_team1 {
        snapshot.score_team1 = score;
        changed.scores = true;
    }
    if let Some(score) = patch.score_team2 {
        snapshot.score_team2 = score;
        changed.scores = true;
    }
    if let Some(status) = &patch.status {
        snapshot.status = status.clone();
        changed.status = true;
    }
    if let Some(stats) = &patch.stats {
        snapshot.stats = Some(stats.clone());
        changed.stats = true;
    }
    if let Some(team) = &patch.team1 {
        snapshot.team1 = Some(team.clone());
        changed.teams = true;
    }
    if let Some(team) = &patch.team2 {
        snapshot.team2 = Some(team.clone());
        changed.teams = true;
    }
    changed.event = patch.event.is_some();
    changed
}

/// Minutes-played clock derived from the match timestamps. Second half counts
/// from the second-half kickoff plus the 45 first-half minutes; stoppage time
/// renders as `45+n'` / `90+n'`.
pub fn match_clock(m: &Match, now: NaiveDateTime) -> Option<String> {
    if let Some(second) = m.second_start.as_deref().and_then(parse_wire_time) {
        let played = (now - second).num_minutes().max(0) + 45;
        if played > 90 {
            return Some(format!("90+{}'", played - 90));
        }
        return Some(format!("{played}'"));
    }
    if let Some(start) = m.start_time.as_deref().and_then(parse_wire_time) {
        let played = (now - start).num_minutes().max(0);
        if played > 45 {
            return Some(format!("45+{}'", played - 45));
        }
        return Some(format!("{played}'"));
    }
    None
}

/// Status line for the scoreboard. Unrecognized wire statuses pass through
/// verbatim.
pub fn status_line(m: &Match, now: NaiveDateTime) -> String {
    match m.status() {
        Some(MatchStatus::NotStarted) => "Not Started".to_string(),
        Some(MatchStatus::Running) => {
            match_clock(m, now).unwrap_or_else(|| "Running".to_string())
        }
        Some(MatchStatus::HalfTime) => "HT".to_string(),
        Some(MatchStatus::FullTime) => "FT".to_string(),
        None => m.status.clone(),
    }
}

/// Percentage split for a paired stat. An all-zero pair splits evenly so the
/// bars stay balanced instead of collapsing.
pub fn stat_split(team1: u32, team2: u32) -> (f64, f64) {
    let total = team1 + team2;
    if total == 0 {
        return (50.0, 50.0);
    }
    let left = f64::from(team1) / f64::from(total) * 100.0;
    let right = f64::from(team2) / f64::from(total) * 100.0;
    (left, right)
}

/// Age as elapsed years plus remaining days, with 365.25-day years to absorb
/// leap days.
pub fn years_and_days(birth: &str, today: NaiveDate) -> Option<String> {
    let born = parse_wire_date(birth)?;
    let days = (today - born).num_days();
    if days < 0 {
        return None;
    }
    let years = (days as f64 / 365.25).floor() as i64;
    let rem = (days as f64 % 365.25).floor() as i64;
    Some(format!("{years} years, {rem} days"))
}

/// Short locale-style date for the match cards, e.g. `Apr 15, 2024`.
pub fn short_date(raw: &str) -> String {
    match parse_wire_time(raw).map(|dt| dt.date()).or_else(|| parse_wire_date(raw)) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn sort_newest_first(matches: &mut [Match]) {
    matches.sort_by(|a, b| created_key(b).cmp(&created_key(a)));
}

fn created_key(m: &Match) -> NaiveDateTime {
    m.created_at
        .as_deref()
        .and_then(parse_wire_time)
        .unwrap_or(NaiveDateTime::MIN)
}
