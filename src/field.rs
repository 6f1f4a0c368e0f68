use crate::model::{Player, PlayerPosition};

/// One horizontal band of the pitch: its depth from the attacking baseline,
/// the positions that slot into it, and how many players it shows.
#[derive(Debug, Clone, Copy)]
pub struct FormationRow {
    pub row_pct: f64,
    pub cap: usize,
    pub positions: &'static [PlayerPosition],
}

const DEFENDERS: &[PlayerPosition] = &[
    PlayerPosition::CentreBack,
    PlayerPosition::Sweeper,
    PlayerPosition::LeftBack,
    PlayerPosition::RightBack,
    PlayerPosition::LeftWingBack,
    PlayerPosition::RightWingBack,
];

const MIDFIELDERS: &[PlayerPosition] = &[
    PlayerPosition::DefensiveMidfielder,
    PlayerPosition::CentralMidfielder,
    PlayerPosition::AttackingMidfielder,
    PlayerPosition::LeftMidfielder,
    PlayerPosition::RightMidfielder,
    PlayerPosition::LeftWinger,
    PlayerPosition::RightWinger,
];

const FORWARDS: &[PlayerPosition] = &[
    PlayerPosition::Striker,
    PlayerPosition::CentreForward,
    PlayerPosition::SecondStriker,
    PlayerPosition::FalseNine,
    PlayerPosition::LeftForward,
    PlayerPosition::RightForward,
];

pub const FORMATION: [FormationRow; 4] = [
    FormationRow {
        row_pct: 10.0,
        cap: 1,
        positions: &[PlayerPosition::Goalkeeper],
    },
    FormationRow {
        row_pct: 30.0,
        cap: 3,
        positions: DEFENDERS,
    },
    FormationRow {
        row_pct: 50.0,
        cap: 4,
        positions: MIDFIELDERS,
    },
    FormationRow {
        row_pct: 70.0,
        cap: 3,
        positions: FORWARDS,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub x_pct: f64,
    pub y_pct: f64,
    pub number: Option<u32>,
    pub name: String,
}

/// Places a lineup onto the pitch. Each formation row keeps the first `cap`
/// players whose position belongs to it, spaced evenly across a 90%-wide band
/// (a lone player sits centered). The home side counts rows from the top
/// edge, the away side mirrors from the bottom.
pub fn layout_team(lineup: &[Player], home: bool) -> Vec<FieldSlot> {
    let mut slots = Vec::new();

    for row in &FORMATION {
        let picked: Vec<&Player> = lineup
            .iter()
            .filter(|p| row.positions.contains(&p.position))
            .take(row.cap)
            .collect();
        if picked.is_empty() {
            continue;
        }

        let step = 90.0 / picked.len() as f64;
        let mut x = if picked.len() == 1 {
            45.0
        } else {
            (90.0 - step) / picked.len() as f64
        };
        let y = if home { row.row_pct } else { 100.0 - row.row_pct };

        for player in picked {
            slots.push(FieldSlot {
                x_pct: x,
                y_pct: y,
                number: player.number,
                name: player.name.clone(),
            });
            x += step;
        }
    }

    slots
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchSlot {
    pub name: &'static str,
    pub role: &'static str,
}

/// The backend does not supply bench players, so substitute lists show
/// placeholder entries. Known gap, kept visible on purpose.
pub fn placeholder_bench() -> [BenchSlot; 3] {
    [
        BenchSlot {
            name: "Substitute Player 1",
            role: "Forward",
        },
        BenchSlot {
            name: "Substitute Player 2",
            role: "Midfielder",
        },
        BenchSlot {
            name: "Substitute Player 3",
            role: "Defender",
        },
    ]
}
