use matchday_terminal::model::{Match, MatchPatch, Player, PlayerPosition, TimelineEventKind};

#[test]
fn match_json_parses_with_nested_teams_and_stats() {
    let raw = r#"{
        "id": 7,
        "team1_id": 1,
        "team2_id": 2,
        "score_team1": 2,
        "score_team2": 1,
        "status": "running",
        "start_time": "2024-04-15T20:00:00",
        "half_time": null,
        "team1": {"id": 1, "name": "Arsenal", "city": "London", "players": []},
        "team2": {"id": 2, "name": "Chelsea", "players": []},
        "stats": {"possession_team1": 58, "possession_team2": 42, "shots_team1": 14},
        "created_at": "2024-04-10T09:30:00"
    }"#;
    let m: Match = serde_json::from_str(raw).expect("match should parse");
    assert_eq!(m.id, 7);
    assert_eq!(m.team1_name(), "Arsenal");
    assert_eq!(m.team2_name(), "Chelsea");
    assert_eq!(m.stats.as_ref().unwrap().possession_team1, 58);
    // Unsent counters default to zero.
    assert_eq!(m.stats.as_ref().unwrap().corners_team2, 0);
}

#[test]
fn unknown_status_survives_deserialization() {
    let raw = r#"{"id": 3, "status": "abandoned"}"#;
    let m: Match = serde_json::from_str(raw).expect("match should parse");
    assert_eq!(m.status, "abandoned");
    assert!(m.status().is_none());
}

#[test]
fn missing_team_references_fall_back_to_tba() {
    let raw = r#"{"id": 4, "status": "not_started"}"#;
    let m: Match = serde_json::from_str(raw).expect("match should parse");
    assert_eq!(m.team1_name(), "TBA");
    assert_eq!(m.team2_name(), "TBA");
}

#[test]
fn player_positions_use_the_wire_spelling() {
    let raw = r#"{
        "id": 11,
        "name": "J. Nox",
        "birth": "1999-02-20",
        "position": "defensive_midfielder",
        "appearances": 12,
        "goals": 3,
        "assists": 4
    }"#;
    let p: Player = serde_json::from_str(raw).expect("player should parse");
    assert_eq!(p.position, PlayerPosition::DefensiveMidfielder);
    assert_eq!(p.position.wire_name(), "defensive_midfielder");
    assert_eq!(p.team_name(), "Unassigned");
}

#[test]
fn patch_parses_partial_fields_only() {
    let raw = r#"{"score_team1": 2}"#;
    let patch: MatchPatch = serde_json::from_str(raw).expect("patch should parse");
    assert_eq!(patch.score_team1, Some(2));
    assert!(patch.score_team2.is_none());
    assert!(patch.status.is_none());
    assert!(patch.stats.is_none());
    assert!(patch.event.is_none());
}

#[test]
fn patch_event_kinds_map_from_wire_names() {
    let raw = r#"{"event": {"type": "yellow_card", "time": 27, "description": "Rough tackle"}}"#;
    let patch: MatchPatch = serde_json::from_str(raw).expect("patch should parse");
    let event = patch.event.expect("event should be present");
    assert_eq!(event.kind, TimelineEventKind::YellowCard);
    assert_eq!(event.minute, 27);
}

#[test]
fn unknown_event_types_fall_back_to_other() {
    let raw = r#"{"event": {"type": "var_review", "time": 63, "description": "Checking goal"}}"#;
    let patch: MatchPatch = serde_json::from_str(raw).expect("patch should parse");
    assert_eq!(patch.event.unwrap().kind, TimelineEventKind::Other);
}
