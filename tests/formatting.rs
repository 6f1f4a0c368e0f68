use chrono::NaiveDate;
use matchday_terminal::model::{
    Match, match_clock, short_date, sort_newest_first, stat_split, status_line, years_and_days,
};

fn fixed_now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, 15)
        .unwrap()
        .and_hms_opt(20, 46, 0)
        .unwrap()
}

#[test]
fn clock_counts_second_half_from_kickoff_plus_45() {
    let m = Match {
        status: "running".to_string(),
        start_time: Some("2024-04-15T19:00".to_string()),
        second_start: Some("2024-04-15T20:00".to_string()),
        ..Match::default()
    };
    // 46 minutes into the second half: 45 + 46 = 91 played.
    assert_eq!(match_clock(&m, fixed_now()).as_deref(), Some("90+1'"));
}

#[test]
fn clock_counts_first_half_from_start() {
    let m = Match {
        status: "running".to_string(),
        start_time: Some("2024-04-15T20:16".to_string()),
        ..Match::default()
    };
    assert_eq!(match_clock(&m, fixed_now()).as_deref(), Some("30'"));
}

#[test]
fn clock_shows_first_half_stoppage() {
    let m = Match {
        status: "running".to_string(),
        start_time: Some("2024-04-15T19:56".to_string()),
        ..Match::default()
    };
    assert_eq!(match_clock(&m, fixed_now()).as_deref(), Some("45+5'"));
}

#[test]
fn clock_needs_a_timestamp() {
    let m = Match {
        status: "running".to_string(),
        ..Match::default()
    };
    assert_eq!(match_clock(&m, fixed_now()), None);
    assert_eq!(status_line(&m, fixed_now()), "Running");
}

#[test]
fn status_labels() {
    let mut m = Match {
        status: "not_started".to_string(),
        ..Match::default()
    };
    assert_eq!(status_line(&m, fixed_now()), "Not Started");
    m.status = "half_time".to_string();
    assert_eq!(status_line(&m, fixed_now()), "HT");
    m.status = "full_time".to_string();
    assert_eq!(status_line(&m, fixed_now()), "FT");
}

#[test]
fn unrecognized_status_passes_through_verbatim() {
    let m = Match {
        status: "abandoned".to_string(),
        ..Match::default()
    };
    assert_eq!(status_line(&m, fixed_now()), "abandoned");
}

#[test]
fn running_status_prefers_the_clock() {
    let m = Match {
        status: "running".to_string(),
        start_time: Some("2024-04-15T20:16".to_string()),
        ..Match::default()
    };
    assert_eq!(status_line(&m, fixed_now()), "30'");
}

#[test]
fn stat_split_is_even_for_zero_pairs() {
    assert_eq!(stat_split(0, 0), (50.0, 50.0));
}

#[test]
fn stat_split_is_exact_and_sums_to_100() {
    assert_eq!(stat_split(1, 3), (25.0, 75.0));
    let (left, right) = stat_split(7, 13);
    assert!((left - 35.0).abs() < 1e-9);
    assert!((right - 65.0).abs() < 1e-9);
    assert!((left + right - 100.0).abs() < 1e-9);
}

#[test]
fn age_renders_years_and_remaining_days() {
    // 2023-06-01 to 2025-06-11 spans one leap day: 741 days.
    let today = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
    assert_eq!(
        years_and_days("2023-06-01", today).as_deref(),
        Some("2 years, 10 days")
    );
}

#[test]
fn age_rejects_future_birth_dates() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
    assert_eq!(years_and_days("2030-01-01", today), None);
    assert_eq!(years_and_days("not a date", today), None);
}

#[test]
fn short_date_formats_card_badges() {
    assert_eq!(short_date("2024-04-15T20:00:00"), "Apr 15, 2024");
    assert_eq!(short_date("2024-04-15"), "Apr 15, 2024");
    // Unparsable input falls back to the raw value.
    assert_eq!(short_date("soon"), "soon");
}

#[test]
fn browse_sorts_newest_first() {
    let mut matches = vec![
        Match {
            id: 1,
            created_at: Some("2024-04-10T12:00:00".to_string()),
            ..Match::default()
        },
        Match {
            id: 2,
            created_at: Some("2024-04-15T12:00:00".to_string()),
            ..Match::default()
        },
        Match {
            id: 3,
            created_at: None,
            ..Match::default()
        },
    ];
    sort_newest_first(&mut matches);
    let ids: Vec<i64> = matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![2, 1, 3]);
}
