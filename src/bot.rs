//! Outcome-statistics bots.
//!
//! A bot holds its own copy of a previously built (usually deserialized)
//! aggregate subtree and picks moves from the statistics of the current
//! node's direct children, advancing its pointer as the real game
//! advances.

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{BalanceError, BalanceResult};
use crate::game::ActionId;
use crate::outcome_tree::OutcomeNode;

/// Playing strength, level 1 (weakest) through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
    Expert = 4,
}

impl Difficulty {
    pub fn from_level(level: u8) -> Option<Difficulty> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            4 => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        *self as u8
    }
}

/// A move-selection policy over an aggregate tree.
///
/// All four difficulties rank the current children ascending by their
/// `win_second` counter. The ranking key is the same no matter which
/// side the bot plays; the surrounding game setup fixed that convention
/// and it is kept here as observed.
pub struct TreeBot {
    node: OutcomeNode,
    difficulty: Difficulty,
    rng: StdRng,
}

impl TreeBot {
    pub fn new(tree: OutcomeNode, difficulty: Difficulty) -> Self {
        TreeBot {
            node: tree,
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    /// Bot with a fixed RNG seed, for reproducible games.
    pub fn seeded(tree: OutcomeNode, difficulty: Difficulty, seed: u64) -> Self {
        TreeBot {
            node: tree,
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The subtree the bot currently stands on.
    pub fn current(&self) -> &OutcomeNode {
        &self.node
    }

    /// Follow `action` one level down. The chosen child subtree becomes
    /// the bot's current node (ownership moves); the old node and every
    /// sibling subtree are dropped. An unknown action fails and leaves
    /// the bot untouched.
    pub fn advance(&mut self, action: ActionId) -> BalanceResult<()> {
        match self.node.children.remove(&action) {
            Some(child) => {
                self.node = child;
                Ok(())
            }
            None => Err(BalanceError::UnknownAction(action)),
        }
    }

    /// Pick the next action from the current children, or `None` once
    /// the tree has run out of moves.
    pub fn select_action(&mut self) -> Option<ActionId> {
        let ranked: Vec<(ActionId, i32)> = self
            .node
            .children
            .iter()
            .map(|(action, child)| (*action, child.win_second))
            .sorted_by_key(|&(_, wins)| wins)
            .collect();

        if ranked.is_empty() {
            return None;
        }
        if ranked.len() == 1 {
            return Some(ranked[0].0);
        }

        let half = ranked.len() / 2;
        let index = match self.difficulty {
            Difficulty::Easy => 0,
            Difficulty::Expert => ranked.len() - 1,
            Difficulty::Medium => self.rng.gen_range(0..half),
            Difficulty::Hard => self.rng.gen_range(half..ranked.len()),
        };
        Some(ranked[index].0)
    }
}
