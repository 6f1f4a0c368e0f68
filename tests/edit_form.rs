use matchday_terminal::form::{
    clamp_number, match_edit_form, match_update_payload, player_payload, validate_edit,
    validate_timeline,
};
use matchday_terminal::form::{Field, player_form};
use matchday_terminal::model::{Match, MatchStats};

fn edit_source() -> Match {
    Match {
        id: 7,
        score_team1: 2,
        score_team2: 1,
        status: "running".to_string(),
        start_time: Some("2024-04-15T20:00:00".to_string()),
        stats: Some(MatchStats {
            possession_team1: 58,
            possession_team2: 42,
            shots_team1: 14,
            shots_team2: 9,
            ..MatchStats::default()
        }),
        ..Match::default()
    }
}

#[test]
fn half_time_requires_start_time() {
    assert_eq!(
        validate_timeline("", "2024-04-15T20:45", "", ""),
        Err("Cannot set Half Time without Start Time")
    );
}

#[test]
fn second_start_requires_half_time() {
    assert_eq!(
        validate_timeline("2024-04-15T20:00", "", "2024-04-15T21:00", ""),
        Err("Cannot set Second Half Start without Half Time")
    );
}

#[test]
fn end_time_requires_second_start() {
    assert_eq!(
        validate_timeline("2024-04-15T20:00", "2024-04-15T20:45", "", "2024-04-15T22:00"),
        Err("Cannot set End Time without Second Half Start")
    );
}

#[test]
fn equal_timestamps_are_not_strictly_after() {
    assert_eq!(
        validate_timeline("2024-04-15T20:00", "2024-04-15T20:00", "", ""),
        Err("Half Time must be after Start Time")
    );
    assert_eq!(
        validate_timeline(
            "2024-04-15T20:00",
            "2024-04-15T20:45",
            "2024-04-15T20:30",
            ""
        ),
        Err("Second Half Start must be after Half Time")
    );
    assert_eq!(
        validate_timeline(
            "2024-04-15T20:00",
            "2024-04-15T20:45",
            "2024-04-15T21:00",
            "2024-04-15T21:00"
        ),
        Err("End Time must be after Second Half Start")
    );
}

#[test]
fn ordered_timeline_is_accepted() {
    assert_eq!(
        validate_timeline(
            "2024-04-15T20:00",
            "2024-04-15T20:01",
            "2024-04-15T20:46",
            "2024-04-15T21:31"
        ),
        Ok(())
    );
    // A match that never started is fine too.
    assert_eq!(validate_timeline("", "", "", ""), Ok(()));
}

#[test]
fn clamping_forces_values_into_range() {
    let mut value = "-5".to_string();
    clamp_number(&mut value, 99);
    assert_eq!(value, "0");

    let mut value = "120".to_string();
    clamp_number(&mut value, 100);
    assert_eq!(value, "100");

    let mut value = "42".to_string();
    clamp_number(&mut value, 99);
    assert_eq!(value, "42");
}

#[test]
fn number_fields_clamp_while_typing() {
    let mut field = Field::number("shots_team1", "Shots T1", "9", 99);
    field.input_char('9');
    assert_eq!(field.value(), "99");
    // A third digit would overflow the max; the value pins at the ceiling.
    field.input_char('9');
    assert_eq!(field.value(), "99");
    // Non-digits never enter a numeric field.
    field.input_char('-');
    assert_eq!(field.value(), "99");
}

#[test]
fn edit_form_is_populated_from_the_match() {
    let form = match_edit_form(&edit_source());
    assert_eq!(form.value_of("score_team1"), "2");
    assert_eq!(form.value_of("status"), "running");
    assert_eq!(form.value_of("start_time"), "2024-04-15T20:00");
    assert_eq!(form.value_of("half_time"), "");
    assert_eq!(form.value_of("possession_team1"), "58");
    assert_eq!(form.value_of("shots_team2"), "9");
}

#[test]
fn edit_form_validation_uses_its_own_fields() {
    let mut m = edit_source();
    m.start_time = None;
    m.half_time = Some("2024-04-15T20:45".to_string());
    let form = match_edit_form(&m);
    assert_eq!(
        validate_edit(&form),
        Err("Cannot set Half Time without Start Time")
    );
}

#[test]
fn payload_splits_match_and_stats_updates() {
    let form = match_edit_form(&edit_source());
    let payload = match_update_payload(&form);

    let match_update = &payload["match_update"];
    assert_eq!(match_update["score_team1"], 2);
    assert_eq!(match_update["score_team2"], 1);
    assert_eq!(match_update["status"], "running");
    assert_eq!(match_update["start_time"], "2024-04-15T20:00");
    // Absent timestamps travel as explicit nulls.
    assert!(match_update["half_time"].is_null());
    assert!(match_update["second_start"].is_null());
    assert!(match_update["end_time"].is_null());

    let stats_update = payload["stats_update"].as_object().unwrap();
    assert_eq!(stats_update.len(), 16);
    assert_eq!(stats_update["possession_team1"], 58);
    assert_eq!(stats_update["offsides_team2"], 0);
}

#[test]
fn unparsable_counters_default_to_zero() {
    let mut form = match_edit_form(&edit_source());
    if let Some(field) = form.fields.iter_mut().find(|f| f.name == "score_team1") {
        field.value = String::new();
    }
    if let Some(field) = form.fields.iter_mut().find(|f| f.name == "shots_team1") {
        field.value = "n/a".to_string();
    }
    let payload = match_update_payload(&form);
    assert_eq!(payload["match_update"]["score_team1"], 0);
    assert_eq!(payload["stats_update"]["shots_team1"], 0);
}

#[test]
fn player_payload_nulls_optional_references() {
    let form = player_form(&[], None);
    let payload = player_payload(&form);
    assert_eq!(payload["position"], "goalkeeper");
    assert!(payload["number"].is_null());
    assert!(payload["team_id"].is_null());
    assert!(payload["birth"].is_null());
}
