//! The bundled demo game.
//!
//! Two players forage a small rectangular glade: the root chance node
//! deals one of the C(rows·cols, items) placements of `items` identical
//! items onto the board, then the players alternate removing one item
//! per turn. Each cell is worth a fixed bonus, but the two players value
//! the board differently: the second player's bonus table is the
//! column-mirrored first-player table. Once every item is taken, the
//! higher total wins.
//!
//! The analysis core never depends on this module; it is the concrete
//! collaborator the CLI and the integration tests drive the pipeline
//! with.

use std::rc::Rc;

use itertools::Itertools;

use crate::game::{ActionId, GameState};

/// Board geometry and item count for one glade instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GladeConfig {
    pub rows: usize,
    pub cols: usize,
    /// Items dealt onto the board; equals the game length in moves.
    pub items: usize,
}

impl Default for GladeConfig {
    fn default() -> Self {
        GladeConfig {
            rows: 3,
            cols: 4,
            items: 4,
        }
    }
}

impl GladeConfig {
    pub fn board_size(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// Immutable per-game data shared by every state of one glade instance:
/// all dealable layouts and both players' bonus tables.
#[derive(Debug)]
struct GladeRules {
    config: GladeConfig,
    /// Every placement of `items` items, in lexicographic cell order;
    /// chance action `i` deals `layouts[i]`.
    layouts: Vec<Vec<bool>>,
    /// Per-player cell values; `bonus[1]` is `bonus[0]` mirrored in the
    /// column axis.
    bonus: [Vec<i32>; 2],
}

impl GladeRules {
    fn new(config: GladeConfig) -> Self {
        let cells = config.cells();

        let layouts: Vec<Vec<bool>> = (0..cells)
            .combinations(config.items)
            .map(|picked| {
                let mut board = vec![false; cells];
                for cell in picked {
                    board[cell] = true;
                }
                board
            })
            .collect();

        // Cells near the central row and the left edge are worth more to
        // player 1.
        let center_row = (config.rows / 2) as i32;
        let mut first = Vec::with_capacity(cells);
        for r in 0..config.rows as i32 {
            for c in 0..config.cols as i32 {
                first.push(config.rows as i32 - (center_row - r).abs() + config.cols as i32 - c);
            }
        }

        // Column difference scale, used to mirror the table for the
        // second player.
        let scale: Vec<i32> = (0..config.cols)
            .map(|c| first[c] - first[config.cols - 1 - c])
            .collect();
        let second: Vec<i32> = first
            .iter()
            .enumerate()
            .map(|(i, &value)| value - scale[i % config.cols])
            .collect();

        GladeRules {
            config,
            layouts,
            bonus: [first, second],
        }
    }
}

/// One glade game state. The initial state is the dealing chance node;
/// every later state is a player decision over the remaining items.
#[derive(Clone)]
pub struct GladeState {
    rules: Rc<GladeRules>,
    /// Cells still holding an item; empty until the deal.
    remaining: Vec<ActionId>,
    dealt: bool,
    to_move: usize,
    scores: [i32; 2],
    picks: usize,
}

impl GladeState {
    pub fn new(config: GladeConfig) -> Self {
        GladeState {
            rules: Rc::new(GladeRules::new(config)),
            remaining: Vec::new(),
            dealt: false,
            to_move: 0,
            scores: [0, 0],
            picks: 0,
        }
    }

    pub fn config(&self) -> GladeConfig {
        self.rules.config
    }

    /// Number of dealable layouts, i.e. root chance branches.
    pub fn layout_count(&self) -> usize {
        self.rules.layouts.len()
    }
}

impl GameState for GladeState {
    fn is_terminal(&self) -> bool {
        self.dealt && self.picks == self.rules.config.items
    }

    fn returns(&self) -> (f64, f64) {
        match self.scores[0].cmp(&self.scores[1]) {
            std::cmp::Ordering::Greater => (1.0, -1.0),
            std::cmp::Ordering::Less => (-1.0, 1.0),
            std::cmp::Ordering::Equal => (0.0, 0.0),
        }
    }

    fn is_chance_node(&self) -> bool {
        !self.dealt
    }

    fn chance_outcomes(&self) -> Vec<(ActionId, f64)> {
        let n = self.rules.layouts.len();
        let p = 1.0 / n as f64;
        (0..n as ActionId).map(|i| (i, p)).collect()
    }

    fn legal_actions(&self) -> Vec<ActionId> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.remaining.clone()
    }

    fn child(&self, action: ActionId) -> Self {
        let mut next = self.clone();
        if !self.dealt {
            let layout = &self.rules.layouts[action as usize];
            next.remaining = layout
                .iter()
                .enumerate()
                .filter(|(_, &occupied)| occupied)
                .map(|(cell, _)| cell as ActionId)
                .collect();
            next.dealt = true;
            next.to_move = 0;
        } else {
            debug_assert!(self.remaining.contains(&action));
            next.remaining.retain(|&cell| cell != action);
            next.scores[self.to_move] += self.rules.bonus[self.to_move][action as usize];
            next.to_move = 1 - self.to_move;
            next.picks += 1;
        }
        next
    }
}
