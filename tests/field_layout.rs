use matchday_terminal::field::{FORMATION, layout_team, placeholder_bench};
use matchday_terminal::model::{Player, PlayerPosition};

fn player(name: &str, position: PlayerPosition, number: u32) -> Player {
    Player {
        id: 0,
        name: name.to_string(),
        birth: None,
        position,
        number: Some(number),
        appearances: 0,
        goals: 0,
        assists: 0,
        team_id: None,
        team: None,
        created_at: None,
        updated_at: None,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn formation_rows_are_fixed() {
    let depths: Vec<f64> = FORMATION.iter().map(|row| row.row_pct).collect();
    assert_eq!(depths, vec![10.0, 30.0, 50.0, 70.0]);
    let caps: Vec<usize> = FORMATION.iter().map(|row| row.cap).collect();
    assert_eq!(caps, vec![1, 3, 4, 3]);
}

#[test]
fn lone_goalkeeper_is_centered() {
    let lineup = vec![player("A. Stone", PlayerPosition::Goalkeeper, 1)];
    let slots = layout_team(&lineup, true);
    assert_eq!(slots.len(), 1);
    assert!(close(slots[0].x_pct, 45.0));
    assert!(close(slots[0].y_pct, 10.0));
}

#[test]
fn defender_row_truncates_to_three_and_spaces_evenly() {
    let lineup = vec![
        player("D1", PlayerPosition::CentreBack, 4),
        player("D2", PlayerPosition::LeftBack, 3),
        player("D3", PlayerPosition::RightBack, 2),
        player("D4", PlayerPosition::Sweeper, 5),
        player("D5", PlayerPosition::LeftWingBack, 6),
    ];
    let slots = layout_team(&lineup, true);
    assert_eq!(slots.len(), 3);
    // 90/3 = 30 steps starting at (90-30)/3 = 20.
    assert!(close(slots[0].x_pct, 20.0));
    assert!(close(slots[1].x_pct, 50.0));
    assert!(close(slots[2].x_pct, 80.0));
    assert!(slots.iter().all(|slot| close(slot.y_pct, 30.0)));
    // First-come order decides who makes the cut.
    assert_eq!(slots[0].name, "D1");
    assert_eq!(slots[2].name, "D3");
}

#[test]
fn midfield_row_of_four_is_centered_in_the_band() {
    let lineup = vec![
        player("M1", PlayerPosition::DefensiveMidfielder, 6),
        player("M2", PlayerPosition::CentralMidfielder, 8),
        player("M3", PlayerPosition::AttackingMidfielder, 10),
        player("M4", PlayerPosition::LeftWinger, 11),
    ];
    let slots = layout_team(&lineup, true);
    assert_eq!(slots.len(), 4);
    // Step 22.5, starting at (90 - 22.5)/4 = 16.875.
    assert!(close(slots[0].x_pct, 16.875));
    assert!(close(slots[1].x_pct, 39.375));
    assert!(close(slots[2].x_pct, 61.875));
    assert!(close(slots[3].x_pct, 84.375));
}

#[test]
fn away_side_mirrors_from_the_bottom_edge() {
    let lineup = vec![
        player("GK", PlayerPosition::Goalkeeper, 1),
        player("FW", PlayerPosition::Striker, 9),
    ];
    let slots = layout_team(&lineup, false);
    assert_eq!(slots.len(), 2);
    assert!(close(slots[0].y_pct, 90.0));
    assert!(close(slots[1].y_pct, 30.0));
}

#[test]
fn specialized_roles_do_not_slot_into_any_row() {
    let lineup = vec![
        player("P1", PlayerPosition::Playmaker, 10),
        player("P2", PlayerPosition::Libero, 5),
    ];
    assert!(layout_team(&lineup, true).is_empty());
}

#[test]
fn bench_is_placeholder_data() {
    let bench = placeholder_bench();
    assert_eq!(bench.len(), 3);
    assert_eq!(bench[0].name, "Substitute Player 1");
}
