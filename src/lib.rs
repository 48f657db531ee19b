//! Game balance analysis toolkit.
//!
//! Exhaustively enumerates a chance-rooted two-player zero-sum game
//! behind the [`game::GameState`] trait, aggregates terminal outcomes
//! into a per-subtree win/loss/draw tree, persists that tree in a
//! compact binary image, buckets root setups by how lopsided they are,
//! searches the tree for extremal states, and drives move-selection
//! bots from the aggregated statistics.

pub mod bot;
pub mod classify;
pub mod cli;
pub mod codec;
pub mod display;
pub mod error;
pub mod export;
pub mod game;
pub mod glade;
pub mod outcome_tree;
pub mod search;
pub mod tally;
