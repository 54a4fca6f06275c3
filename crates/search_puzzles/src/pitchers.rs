//! Three-pitcher measuring puzzle.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::frontier::{Problem, SearchMode, breadth_first};

/// A pitcher operation. Pitchers are numbered from 1 in display output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum PitcherAction {
    /// Fill pitcher `i` to capacity.
    #[display("Fill P{}", _0 + 1)]
    Fill(usize),
    /// Pour pitcher `i` away.
    #[display("Empty P{}", _0 + 1)]
    Empty(usize),
    /// Pour from one pitcher into another until the source is empty or the
    /// target is full.
    #[display("P{}=>P{}", from + 1, to + 1)]
    Pour {
        /// Source pitcher index.
        from: usize,
        /// Target pitcher index.
        to: usize,
    },
}

impl PitcherAction {
    /// Every action, in the order the search tries them: fills, empties,
    /// then pours by source and target.
    fn all() -> Vec<Self> {
        let mut actions: Vec<Self> = (0..3).map(Self::Fill).collect();
        actions.extend((0..3).map(Self::Empty));
        for from in 0..3 {
            for to in (0..3).filter(|&to| to != from) {
                actions.push(Self::Pour { from, to });
            }
        }
        actions
    }
}

struct Pitchers {
    capacities: [u32; 3],
    target: u32,
    actions: Vec<PitcherAction>,
}

impl Pitchers {
    fn apply(&self, mut levels: [u32; 3], action: PitcherAction) -> [u32; 3] {
        match action {
            PitcherAction::Fill(i) => levels[i] = self.capacities[i],
            PitcherAction::Empty(i) => levels[i] = 0,
            PitcherAction::Pour { from, to } => {
                let amount = levels[from].min(self.capacities[to] - levels[to]);
                levels[from] -= amount;
                levels[to] += amount;
            }
        }
        levels
    }
}

impl Problem for Pitchers {
    type State = [u32; 3];
    type Action = PitcherAction;

    fn initial(&self) -> [u32; 3] {
        [0; 3]
    }

    fn is_goal(&self, levels: &[u32; 3]) -> bool {
        levels.contains(&self.target)
    }

    fn successors(&self, levels: &[u32; 3]) -> Vec<(PitcherAction, [u32; 3])> {
        self.actions
            .iter()
            .map(|&action| (action, self.apply(*levels, action)))
            .filter(|(_, next)| next != levels)
            .collect()
    }
}

/// Finds the shortest sequence of pitcher operations after which some
/// pitcher holds exactly `amount` units, starting from three empty pitchers.
///
/// Returns `None` when the amount cannot be measured.
///
/// ```
/// use search_puzzles::pitcher_search;
///
/// let plan = pitcher_search(2, 3, 4, 1).unwrap();
/// let steps: Vec<String> = plan.iter().map(ToString::to_string).collect();
/// assert_eq!(steps, ["Fill P2", "P2=>P1"]);
/// ```
#[instrument]
pub fn pitcher_search(p1: u32, p2: u32, p3: u32, amount: u32) -> Option<Vec<PitcherAction>> {
    let problem = Pitchers {
        capacities: [p1, p2, p3],
        target: amount,
        actions: PitcherAction::all(),
    };
    let plan = breadth_first(&problem, SearchMode::Graph, None);
    info!(
        amount,
        steps = plan.as_ref().map(Vec::len),
        "Pitcher search finished"
    );
    plan
}
