use serde_json::{Map, Value, json};

use crate::model::{Match, MatchStatus, Player, PlayerPosition, Team, parse_wire_time};

/// Field name, form label, input ceiling for every paired stat counter.
const STAT_FIELDS: [(&str, &str, u32); 16] = [
    ("possession_team1", "Possession T1", 100),
    ("possession_team2", "Possession T2", 100),
    ("shots_team1", "Shots T1", 99),
    ("shots_team2", "Shots T2", 99),
    ("shots_on_target_team1", "On Target T1", 99),
    ("shots_on_target_team2", "On Target T2", 99),
    ("corners_team1", "Corners T1", 99),
    ("corners_team2", "Corners T2", 99),
    ("yellow_cards_team1", "Yellow T1", 99),
    ("yellow_cards_team2", "Yellow T2", 99),
    ("red_cards_team1", "Red T1", 99),
    ("red_cards_team2", "Red T2", 99),
    ("fouls_team1", "Fouls T1", 99),
    ("fouls_team2", "Fouls T2", 99),
    ("offsides_team1", "Offsides T1", 99),
    ("offsides_team2", "Offsides T2", 99),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number { max: u32 },
    DateTime,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub options: Vec<SelectOption>,
    pub selected: usize,
}

impl Field {
    pub fn text(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            value: value.into(),
            options: Vec::new(),
            selected: 0,
        }
    }

    pub fn number(
        name: &'static str,
        label: &'static str,
        value: impl Into<String>,
        max: u32,
    ) -> Self {
        let mut value = value.into();
        clamp_number(&mut value, max);
        Self {
            name,
            label,
            kind: FieldKind::Number { max },
            value,
            options: Vec::new(),
            selected: 0,
        }
    }

    pub fn datetime(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::DateTime,
            value: value.into(),
            options: Vec::new(),
            selected: 0,
        }
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        options: Vec<SelectOption>,
        selected_value: &str,
    ) -> Self {
        let selected = options
            .iter()
            .position(|opt| opt.value == selected_value)
            .unwrap_or(0);
        Self {
            name,
            label,
            kind: FieldKind::Select,
            value: String::new(),
            options,
            selected,
        }
    }

    pub fn value(&self) -> String {
        match self.kind {
            FieldKind::Select => self
                .options
                .get(self.selected)
                .map(|opt| opt.value.clone())
                .unwrap_or_default(),
            _ => self.value.clone(),
        }
    }

    pub fn display(&self) -> String {
        match self.kind {
            FieldKind::Select => self
                .options
                .get(self.selected)
                .map(|opt| opt.label.clone())
                .unwrap_or_else(|| "-".to_string()),
            _ => self.value.clone(),
        }
    }

    pub fn input_char(&mut self, ch: char) {
        match self.kind {
            FieldKind::Text => {
                if !ch.is_control() {
                    self.value.push(ch);
                }
            }
            FieldKind::Number { max } => {
                if ch.is_ascii_digit() {
                    self.value.push(ch);
                    clamp_number(&mut self.value, max);
                }
            }
            FieldKind::DateTime => {
                if (ch.is_ascii_digit() || matches!(ch, '-' | 'T' | ':' | ' '))
                    && self.value.len() < 16
                {
                    self.value.push(ch);
                }
            }
            FieldKind::Select => {}
        }
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn cycle(&mut self, forward: bool) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len();
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }
}

/// Forces a numeric field value into `0..=max`, matching the live input
/// clamping on the original form.
pub fn clamp_number(value: &mut String, max: u32) {
    if value.is_empty() {
        return;
    }
    if let Ok(parsed) = value.parse::<i64>() {
        if parsed < 0 {
            *value = "0".to_string();
        } else if parsed > i64::from(max) {
            *value = max.to_string();
        }
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Form {
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
            focus: 0,
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut Field> {
        self.fields.get_mut(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn value_of(&self, name: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    AddTeam,
    AddMatch,
    AddPlayer,
    EditPlayer(i64),
}

#[derive(Debug, Clone)]
pub struct FormModal {
    pub kind: FormKind,
    pub form: Form,
}

fn team_options(teams: &[Team], placeholder: &str) -> Vec<SelectOption> {
    let mut options = vec![SelectOption {
        label: placeholder.to_string(),
        value: String::new(),
    }];
    options.extend(teams.iter().map(|team| SelectOption {
        label: team.name.clone(),
        value: team.id.to_string(),
    }));
    options
}

fn position_options() -> Vec<SelectOption> {
    PlayerPosition::ALL
        .iter()
        .map(|pos| SelectOption {
            label: pos.wire_name().to_string(),
            value: pos.wire_name().to_string(),
        })
        .collect()
}

fn status_options(current: &str) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = MatchStatus::ALL
        .iter()
        .map(|status| SelectOption {
            label: status.label().to_string(),
            value: status.wire_name().to_string(),
        })
        .collect();
    // An unrecognized wire status stays selectable so a submit round-trips it
    // verbatim instead of silently rewriting it.
    if !current.is_empty() && MatchStatus::from_wire(current).is_none() {
        options.push(SelectOption {
            label: current.to_string(),
            value: current.to_string(),
        });
    }
    options
}

/// Re-populates team dropdowns from the freshly cached team collection,
/// keeping the current pick when it still exists.
pub fn refresh_team_options(modal: &mut FormModal, teams: &[Team]) {
    for field in &mut modal.form.fields {
        if field.kind != FieldKind::Select {
            continue;
        }
        let placeholder = match field.name {
            "team_id" => "Unassigned",
            "team1_id" => "Select Team 1",
            "team2_id" => "Select Team 2",
            _ => continue,
        };
        let current = field.value();
        field.options = team_options(teams, placeholder);
        field.selected = field
            .options
            .iter()
            .position(|opt| opt.value == current)
            .unwrap_or(0);
    }
}

pub fn team_form() -> Form {
    Form::new(
        "Add Team",
        vec![
            Field::text("name", "Name", ""),
            Field::text("city", "City", ""),
        ],
    )
}

pub fn match_form(teams: &[Team]) -> Form {
    Form::new(
        "Add Match",
        vec![
            Field::select("team1_id", "Team 1", team_options(teams, "Select Team 1"), ""),
            Field::select("team2_id", "Team 2", team_options(teams, "Select Team 2"), ""),
        ],
    )
}

pub fn player_form(teams: &[Team], existing: Option<&Player>) -> Form {
    let title = if existing.is_some() {
        "Edit Player"
    } else {
        "Add Player"
    };
    let name = existing.map(|p| p.name.clone()).unwrap_or_default();
    let birth = existing
        .and_then(|p| p.birth.clone())
        .unwrap_or_default();
    let position = existing
        .map(|p| p.position.wire_name())
        .unwrap_or(PlayerPosition::Goalkeeper.wire_name());
    let number = existing
        .and_then(|p| p.number)
        .map(|n| n.to_string())
        .unwrap_or_default();
    let team_id = existing
        .and_then(|p| p.team_id)
        .map(|id| id.to_string())
        .unwrap_or_default();
    Form::new(
        title,
        vec![
            Field::text("name", "Name", name),
            Field::datetime("birth", "Birth (YYYY-MM-DD)", birth),
            Field::select("position", "Position", position_options(), position),
            Field::number("number", "Number", number, 99),
            Field::select("team_id", "Team", team_options(teams, "Unassigned"), &team_id),
        ],
    )
}

pub fn match_edit_form(m: &Match) -> Form {
    let stats = m.stats.clone().unwrap_or_default();
    let mut fields = vec![
        Field::number("score_team1", "Score Team 1", m.score_team1.to_string(), 99),
        Field::number("score_team2", "Score Team 2", m.score_team2.to_string(), 99),
        Field::select("status", "Status", status_options(&m.status), &m.status),
        Field::datetime("start_time", "Start Time", truncate16(&m.start_time)),
        Field::datetime("half_time", "Half Time", truncate16(&m.half_time)),
        Field::datetime("second_start", "2nd Half Start", truncate16(&m.second_start)),
        Field::datetime("end_time", "End Time", truncate16(&m.end_time)),
    ];
    let stat_values = stat_values(&stats);
    for ((name, label, max), value) in STAT_FIELDS.into_iter().zip(stat_values) {
        fields.push(Field::number(name, label, value.to_string(), max));
    }
    Form::new("Update Match", fields)
}

fn stat_values(stats: &crate::model::MatchStats) -> [u32; 16] {
    [
        stats.possession_team1,
        stats.possession_team2,
        stats.shots_team1,
        stats.shots_team2,
        stats.shots_on_target_team1,
        stats.shots_on_target_team2,
        stats.corners_team1,
        stats.corners_team2,
        stats.yellow_cards_team1,
        stats.yellow_cards_team2,
        stats.red_cards_team1,
        stats.red_cards_team2,
        stats.fouls_team1,
        stats.fouls_team2,
        stats.offsides_team1,
        stats.offsides_team2,
    ]
}

fn truncate16(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(|raw| raw.chars().take(16).collect())
        .unwrap_or_default()
}

/// Stage-dependency and strict-ordering checks over the four match
/// timestamps. Unparsable values skip the ordering comparison, mirroring the
/// original form's behavior with invalid dates.
pub fn validate_timeline(
    start: &str,
    half: &str,
    second: &str,
    end: &str,
) -> Result<(), &'static str> {
    if !half.is_empty() && start.is_empty() {
        return Err("Cannot set Half Time without Start Time");
    }
    if !second.is_empty() && half.is_empty() {
        return Err("Cannot set Second Half Start without Half Time");
    }
    if !end.is_empty() && second.is_empty() {
        return Err("Cannot set End Time without Second Half Start");
    }

    if let (Some(start), Some(half)) = (parse_wire_time(start), parse_wire_time(half))
        && half <= start
    {
        return Err("Half Time must be after Start Time");
    }
    if let (Some(half), Some(second)) = (parse_wire_time(half), parse_wire_time(second))
        && second <= half
    {
        return Err("Second Half Start must be after Half Time");
    }
    if let (Some(second), Some(end)) = (parse_wire_time(second), parse_wire_time(end))
        && end <= second
    {
        return Err("End Time must be after Second Half Start");
    }
    Ok(())
}

pub fn validate_edit(form: &Form) -> Result<(), &'static str> {
    validate_timeline(
        &form.value_of("start_time"),
        &form.value_of("half_time"),
        &form.value_of("second_start"),
        &form.value_of("end_time"),
    )
}

/// Splits the flat edit form into the composite update body the backend
/// accepts: `{match_update: {...}, stats_update: {...}}`.
pub fn match_update_payload(form: &Form) -> Value {
    let match_update = json!({
        "score_team1": int_or_zero(&form.value_of("score_team1")),
        "score_team2": int_or_zero(&form.value_of("score_team2")),
        "status": form.value_of("status"),
        "start_time": time_or_null(&form.value_of("start_time")),
        "half_time": time_or_null(&form.value_of("half_time")),
        "second_start": time_or_null(&form.value_of("second_start")),
        "end_time": time_or_null(&form.value_of("end_time")),
    });

    let mut stats_update = Map::new();
    for (name, _, _) in STAT_FIELDS {
        stats_update.insert(name.to_string(), int_or_zero(&form.value_of(name)).into());
    }

    json!({
        "match_update": match_update,
        "stats_update": Value::Object(stats_update),
    })
}

pub fn team_payload(form: &Form) -> Value {
    json!({
        "name": form.value_of("name"),
        "city": form.value_of("city"),
    })
}

pub fn match_payload(form: &Form) -> Value {
    json!({
        "team1_id": id_or_null(&form.value_of("team1_id")),
        "team2_id": id_or_null(&form.value_of("team2_id")),
    })
}

pub fn player_payload(form: &Form) -> Value {
    json!({
        "name": form.value_of("name"),
        "birth": str_or_null(&form.value_of("birth")),
        "position": form.value_of("position"),
        "number": id_or_null(&form.value_of("number")),
        "team_id": id_or_null(&form.value_of("team_id")),
    })
}

fn int_or_zero(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

fn id_or_null(raw: &str) -> Value {
    match raw.trim().parse::<i64>() {
        Ok(id) => id.into(),
        Err(_) => Value::Null,
    }
}

fn time_or_null(raw: &str) -> Value {
    str_or_null(raw)
}

fn str_or_null(raw: &str) -> Value {
    if raw.trim().is_empty() {
        Value::Null
    } else {
        raw.into()
    }
}
