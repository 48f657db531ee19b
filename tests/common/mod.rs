//! Shared test fixtures: a scripted game with a prescribed outcome
//! profile per root chance branch.
#![allow(dead_code)]

use std::rc::Rc;

use balance_cli::game::{ActionId, GameState};

/// Result code for one terminal: `1` player 1 wins, `-1` player 2 wins,
/// `0` draw.
pub type ResultCode = i32;

#[derive(Clone)]
enum Stage {
    Root,
    Branch(usize),
    Terminal(ResultCode),
}

/// A two-level game: the chance root branches into one decision node per
/// scripted branch, and that node offers one action per prescribed
/// terminal result. Lets a test dictate exact win/loss/draw profiles.
#[derive(Clone)]
pub struct ScriptedGame {
    branches: Rc<Vec<Vec<ResultCode>>>,
    stage: Stage,
}

impl ScriptedGame {
    pub fn new(branches: Vec<Vec<ResultCode>>) -> Self {
        ScriptedGame {
            branches: Rc::new(branches),
            stage: Stage::Root,
        }
    }

    /// A branch profile with the given number of player-1 wins,
    /// player-2 wins, and draws.
    pub fn profile(win_first: usize, win_second: usize, draws: usize) -> Vec<ResultCode> {
        let mut results = vec![1; win_first];
        results.extend(vec![-1; win_second]);
        results.extend(vec![0; draws]);
        results
    }
}

impl GameState for ScriptedGame {
    fn is_terminal(&self) -> bool {
        matches!(self.stage, Stage::Terminal(_))
    }

    fn returns(&self) -> (f64, f64) {
        match self.stage {
            Stage::Terminal(code) => (code as f64, -code as f64),
            _ => (0.0, 0.0),
        }
    }

    fn is_chance_node(&self) -> bool {
        matches!(self.stage, Stage::Root)
    }

    fn chance_outcomes(&self) -> Vec<(ActionId, f64)> {
        let n = self.branches.len();
        let p = 1.0 / n as f64;
        (0..n as ActionId).map(|i| (i, p)).collect()
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        match self.stage {
            Stage::Branch(branch) => {
                (0..self.branches[branch].len() as ActionId).collect()
            }
            _ => Vec::new(),
        }
    }

    fn child(&self, action: ActionId) -> Self {
        let stage = match self.stage {
            Stage::Root => Stage::Branch(action as usize),
            Stage::Branch(branch) => {
                Stage::Terminal(self.branches[branch][action as usize])
            }
            Stage::Terminal(_) => unreachable!("terminal states have no children"),
        };
        ScriptedGame {
            branches: Rc::clone(&self.branches),
            stage,
        }
    }
}

/// Unique scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("balance_cli_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
