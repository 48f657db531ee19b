//! Abstract two-player game interface.
//!
//! Every analysis component consumes a game exclusively through this
//! trait: concrete rules (move generation, board layout, win conditions)
//! live with the game implementation, not here.

/// Action identifier, as produced by a game and as stored in the
/// persisted tree image (32-bit, see the codec module).
pub type ActionId = i32;

/// A single state of a finite, two-player, zero-sum, perfect-information
/// game. The game may open with one chance node that deals the initial
/// setup; all later nodes are player decisions.
///
/// Implementations must describe a finite game: traversal recurses to
/// every terminal and the aggregation engine assumes it gets there.
pub trait GameState: Sized {
    /// Whether the game has ended at this state.
    fn is_terminal(&self) -> bool;

    /// Terminal payoffs, player 1 first. Only the sign of player 1's
    /// payoff is consumed by the analysis (win / loss / draw).
    fn returns(&self) -> (f64, f64);

    /// Whether the next transition is drawn by chance rather than chosen
    /// by a player.
    fn is_chance_node(&self) -> bool;

    /// All `(action, probability)` pairs at a chance node, in a fixed
    /// natural order.
    fn chance_outcomes(&self) -> Vec<(ActionId, f64)>;

    /// Legal actions at a decision node, in a fixed natural order.
    fn legal_actions(&self) -> Vec<ActionId>;

    /// The state reached by applying `action`. Pure: the receiver is
    /// left untouched.
    fn child(&self, action: ActionId) -> Self;
}
