//! Balance classification.
//!
//! Every root chance setup is assigned to one of 17 fixed buckets by how
//! lopsided its win distribution is: one "balanced" bucket, eight bands
//! favoring player 1 and eight mirrored bands favoring player 2, each
//! band 5 percentage points wide up to a 40% spread. Setups more lopsided
//! than that (and setups sitting exactly on the 1% edge) match no bucket
//! and are dropped from every export.

use once_cell::sync::Lazy;

use crate::outcome_tree::OutcomeNode;

pub const BUCKET_COUNT: usize = 17;

/// Band edges shared by both players' bucket runs: bucket `base + i`
/// takes spreads in `(EDGES[i], EDGES[i + 1]]`.
const EDGES: [f64; 9] = [0.01, 0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40];

/// Display/file metadata for one bucket.
pub struct BucketSpec {
    /// Suffix of every shard file holding this bucket's trees.
    pub file_stem: String,
    pub label: String,
}

pub static BUCKET_SPECS: Lazy<Vec<BucketSpec>> = Lazy::new(|| {
    let mut specs = Vec::with_capacity(BUCKET_COUNT);
    specs.push(BucketSpec {
        file_stem: "_equalTree0_20.bin".to_string(),
        label: "balanced".to_string(),
    });
    for (prefix, who) in [("first", "first player"), ("second", "second player")] {
        for band in 0..8 {
            let lo = band * 5;
            let hi = lo + 5;
            specs.push(BucketSpec {
                file_stem: format!("_{}PlayerTree{}_{}.bin", prefix, lo, hi),
                label: format!("{} +{}-{}%", who, lo, hi),
            });
        }
    }
    specs
});

/// Win-share spread and draw share of a subtree. With a zero total both
/// come out NaN, which no bucket accepts.
pub fn spread(node: &OutcomeNode) -> (f64, f64) {
    let all = node.total() as f64;
    let diff = node.win_first as f64 / all - node.win_second as f64 / all;
    (diff, node.draws as f64 / all)
}

/// Bucket index for a subtree with win-share spread `diff` (positive
/// favors player 1) and draw share `draw_pct`, or `None` when the
/// subtree matches no bucket. Rules are checked in fixed order; the
/// first match wins.
pub fn classify(diff: f64, draw_pct: f64) -> Option<usize> {
    if diff.abs() < 0.01 && draw_pct < 0.2 {
        return Some(0);
    }
    for (base, value) in [(1usize, diff), (9usize, -diff)] {
        for band in 0..8 {
            if value > EDGES[band] && value <= EDGES[band + 1] {
                return Some(base + band);
            }
        }
    }
    None
}
