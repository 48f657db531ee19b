//! Sharded balance export.
//!
//! Scans every root chance outcome in order, builds its aggregate
//! subtree, classifies it into one of the 17 balance buckets, and
//! periodically flushes all buckets to shard files with one summary row
//! per bucket in the statistics sink. Subtrees more lopsided than the
//! outermost bands match no bucket and are absent from every shard.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::classify::{classify, spread, BUCKET_COUNT, BUCKET_SPECS};
use crate::codec;
use crate::error::BalanceResult;
use crate::game::GameState;
use crate::outcome_tree::{build_outcomes, OutcomeNode};

/// Header of the semicolon-delimited statistics file.
pub const STATS_HEADER: &str = "File_name;Strategies_count;Game_length;Board-size;\
First_player_wins_num;Second_player_wins_num;Equal_results_num;All_variants_num;\
First_player_wins_percent;Second_player_wins_percent;Equal_results_percent;";

/// Identity and slicing parameters for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Prefix of every shard file, typically the game's short name.
    pub game_name: String,
    /// Reported verbatim in the stats rows.
    pub game_length: String,
    /// Reported verbatim in the stats rows.
    pub board_size: String,
    /// Number of shard cycles the outcome scan is cut into.
    pub slice_count: usize,
    /// Directory receiving the shard files.
    pub out_dir: PathBuf,
}

/// What one export run did.
#[derive(Debug, Clone, Copy)]
pub struct ExportSummary {
    pub outcomes_seen: usize,
    pub assigned: usize,
    /// Outcomes beyond the ±40% bands, present in no shard.
    pub dropped: usize,
    pub shards: usize,
    pub elapsed_secs: f64,
}

/// Classify every root chance outcome of `root` and export the buckets
/// in shards.
///
/// Outcomes are processed in groups of `⌊outcomes / slice_count⌋`
/// (at least one); after each group every bucket (empty ones
/// included) is persisted to `<shard>_<game><stem>` under the output directory,
/// its stats row is appended, and the buckets reset. A trailing partial
/// group is flushed the same way, so every classified outcome reaches
/// exactly one shard. Progress and timing lines go to `log`.
///
/// A `root` that is not a chance node degenerates to building the whole
/// tree and persisting it as a single `<game>_outcomes.bin`, with no
/// classification and no stats rows.
pub fn classify_and_export<S, WS, WL>(
    root: &S,
    config: &ExportConfig,
    stats: &mut WS,
    log: &mut WL,
) -> BalanceResult<ExportSummary>
where
    S: GameState,
    WS: Write,
    WL: Write,
{
    let start = Instant::now();

    if !root.is_chance_node() {
        let tree = build_outcomes(root);
        let path = config
            .out_dir
            .join(format!("{}_outcomes.bin", config.game_name));
        codec::save_to_path(&tree, path)?;
        let elapsed = start.elapsed().as_secs_f64();
        writeln!(log, "Outcomes counted. Time = {} s.", elapsed)?;
        return Ok(ExportSummary {
            outcomes_seen: 0,
            assigned: 0,
            dropped: 0,
            shards: 1,
            elapsed_secs: elapsed,
        });
    }

    writeln!(stats, "{}", STATS_HEADER)?;

    let outcomes = root.chance_outcomes();
    let group_len = (outcomes.len() / config.slice_count.max(1)).max(1);

    let mut buckets: Vec<OutcomeNode> =
        (0..BUCKET_COUNT).map(|_| OutcomeNode::default()).collect();
    let mut shard = 0;
    let mut in_group = 0;
    let mut assigned = 0;
    let mut dropped = 0;

    for (action, _) in &outcomes {
        // Start at the child past the chance layer: the bucket keeps one
        // subtree per dealt setup, not the chance node itself.
        let subtree = build_outcomes(&root.child(*action));
        let (diff, draw_pct) = spread(&subtree);
        match classify(diff, draw_pct) {
            Some(index) => {
                buckets[index].adopt(*action, subtree);
                assigned += 1;
            }
            None => dropped += 1,
        }

        in_group += 1;
        if in_group == group_len {
            shard += 1;
            flush_buckets(&mut buckets, shard, config, stats, log)?;
            in_group = 0;
        }
    }
    if in_group > 0 {
        shard += 1;
        flush_buckets(&mut buckets, shard, config, stats, log)?;
    }

    let elapsed = start.elapsed().as_secs_f64();
    writeln!(log, "Outcomes counted. Time = {} s.", elapsed)?;

    Ok(ExportSummary {
        outcomes_seen: outcomes.len(),
        assigned,
        dropped,
        shards: shard,
        elapsed_secs: elapsed,
    })
}

/// Persist all 17 buckets as one shard, append their stats rows, and
/// reset them for the next group.
fn flush_buckets<WS: Write, WL: Write>(
    buckets: &mut [OutcomeNode],
    shard: usize,
    config: &ExportConfig,
    stats: &mut WS,
    log: &mut WL,
) -> BalanceResult<()> {
    for (index, bucket) in buckets.iter_mut().enumerate() {
        let file_name = format!(
            "{}_{}{}",
            shard, config.game_name, BUCKET_SPECS[index].file_stem
        );
        write_stats_row(stats, &file_name, bucket, config)?;

        writeln!(log, "{} outcomes serialize...", file_name)?;
        let write_start = Instant::now();
        codec::save_to_path(bucket, config.out_dir.join(&file_name))?;
        writeln!(
            log,
            "Outcomes serialized. Time = {} s.",
            write_start.elapsed().as_secs_f64()
        )?;

        *bucket = OutcomeNode::default();
    }
    Ok(())
}

fn write_stats_row<W: Write>(
    stats: &mut W,
    file_name: &str,
    bucket: &OutcomeNode,
    config: &ExportConfig,
) -> BalanceResult<()> {
    // An empty bucket has a zero total; the percentage columns then come
    // out NaN and are written as such.
    let all = bucket.total() as f64;
    writeln!(
        stats,
        "{};{};{};{};{};{};{};{};{};{};{};",
        file_name,
        bucket.children.len(),
        config.game_length,
        config.board_size,
        bucket.win_first,
        bucket.win_second,
        bucket.draws,
        all,
        bucket.win_first as f64 / all,
        bucket.win_second as f64 / all,
        bucket.draws as f64 / all,
    )?;
    Ok(())
}
