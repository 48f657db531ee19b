mod common;

use std::collections::BTreeMap;

use balance_cli::codec::load_from_path;
use balance_cli::export::{classify_and_export, ExportConfig, STATS_HEADER};
use balance_cli::game::GameState;
use balance_cli::outcome_tree::build_outcomes;
use common::ScriptedGame;

fn scripted() -> ScriptedGame {
    ScriptedGame::new(vec![
        ScriptedGame::profile(50, 50, 0), // balanced        -> bucket 0
        ScriptedGame::profile(52, 48, 0), // diff 0.04       -> bucket 1
        ScriptedGame::profile(30, 70, 0), // diff -0.40      -> bucket 16
        ScriptedGame::profile(80, 20, 0), // diff 0.60       -> dropped
        ScriptedGame::profile(53, 47, 0), // diff 0.06       -> bucket 2
    ])
}

fn run_export(name: &str, slices: usize) -> (std::path::PathBuf, String, String) {
    let dir = common::scratch_dir(name);
    let config = ExportConfig {
        game_name: "scripted".to_string(),
        game_length: "2".to_string(),
        board_size: "test".to_string(),
        slice_count: slices,
        out_dir: dir.clone(),
    };

    let mut stats = Vec::new();
    let mut log = Vec::new();
    classify_and_export(&scripted(), &config, &mut stats, &mut log).unwrap();

    (
        dir,
        String::from_utf8(stats).unwrap(),
        String::from_utf8(log).unwrap(),
    )
}

#[test]
fn test_sharded_export_writes_every_bucket_file() {
    let (dir, stats, log) = run_export("export_files", 2);

    // 5 outcomes, 2 slices: groups of 2, 2, then a remainder of 1.
    for shard in 1..=3 {
        for stem in [
            "_equalTree0_20.bin",
            "_firstPlayerTree0_5.bin",
            "_firstPlayerTree35_40.bin",
            "_secondPlayerTree35_40.bin",
        ] {
            let path = dir.join(format!("{}_scripted{}", shard, stem));
            assert!(path.exists(), "missing shard file {}", path.display());
        }
    }

    // Header plus 17 rows per flush.
    let lines: Vec<&str> = stats.lines().collect();
    assert_eq!(lines[0], STATS_HEADER);
    assert_eq!(lines.len(), 1 + 3 * 17);

    assert!(log.contains("Outcomes counted. Time ="));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_exported_children_cover_exactly_the_classified_outcomes() {
    let (dir, _, _) = run_export("export_union", 2);

    // Collect every stored chance action across all shards and buckets.
    let mut stored: BTreeMap<i32, (i32, i32, i32)> = BTreeMap::new();
    for entry in std::fs::read_dir(&dir).unwrap() {
        let tree = load_from_path(entry.unwrap().path()).unwrap();
        for (action, child) in &tree.children {
            let clash = stored.insert(
                *action,
                (child.win_first, child.win_second, child.draws),
            );
            assert!(clash.is_none(), "outcome {} exported twice", action);
        }
    }

    // Branch 3 (diff 0.60) is silently absent; the rest appear once,
    // with the counters of their own subtrees.
    let game = scripted();
    let expected: BTreeMap<i32, (i32, i32, i32)> = [0, 1, 2, 4]
        .into_iter()
        .map(|action| {
            let subtree = build_outcomes(&game.child(action));
            (action, (subtree.win_first, subtree.win_second, subtree.draws))
        })
        .collect();
    assert_eq!(stored, expected);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_bucket_rows_report_their_own_sums() {
    let (dir, stats, _) = run_export("export_rows", 2);

    // Shard 1 holds branches 0 and 1: bucket 0 gets the 100-outcome
    // balanced branch, bucket 1 the 52/48 branch.
    let row = stats
        .lines()
        .find(|line| line.starts_with("1_scripted_equalTree0_20.bin"))
        .unwrap();
    let fields: Vec<&str> = row.split(';').collect();
    assert_eq!(fields[1], "1"); // assigned outcomes
    assert_eq!(fields[2], "2"); // game length
    assert_eq!(fields[3], "test"); // board size
    assert_eq!(fields[4], "50");
    assert_eq!(fields[5], "50");
    assert_eq!(fields[6], "0");
    assert_eq!(fields[7], "100");
    assert_eq!(fields[8], "0.5");
    assert_eq!(fields[9], "0.5");
    assert_eq!(fields[10], "0");

    // An untouched bucket divides by zero: NaN percentages, not a crash.
    let empty_row = stats
        .lines()
        .find(|line| line.starts_with("1_scripted_firstPlayerTree35_40.bin"))
        .unwrap();
    let fields: Vec<&str> = empty_row.split(';').collect();
    assert_eq!(fields[4], "0");
    assert_eq!(fields[7], "0");
    assert_eq!(fields[8], "NaN");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_empty_bucket_files_roundtrip_as_empty_trees() {
    let (dir, _, _) = run_export("export_empty", 2);

    // Shard 3 (the remainder, branch 4 only) fills bucket 2 and leaves
    // bucket 0 empty.
    let empty = load_from_path(dir.join("3_scripted_equalTree0_20.bin")).unwrap();
    assert!(empty.is_leaf());
    assert_eq!(empty.total(), 0);

    let filled = load_from_path(dir.join("3_scripted_firstPlayerTree5_10.bin")).unwrap();
    assert_eq!(filled.children.len(), 1);
    assert_eq!((filled.win_first, filled.win_second), (53, 47));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_buckets_reset_between_shards() {
    let (dir, _, _) = run_export("export_reset", 2);

    // Branch 1 went to bucket 1 in shard 1; shard 2's bucket-1 file must
    // not still contain it.
    let shard2 = load_from_path(dir.join("2_scripted_firstPlayerTree0_5.bin")).unwrap();
    assert!(shard2.children.is_empty());
    assert_eq!(shard2.total(), 0);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_summary_accounts_for_every_outcome() {
    let dir = common::scratch_dir("export_summary");
    let config = ExportConfig {
        game_name: "scripted".to_string(),
        game_length: "2".to_string(),
        board_size: "test".to_string(),
        slice_count: 2,
        out_dir: dir.clone(),
    };
    let mut stats = Vec::new();
    let mut log = Vec::new();
    let summary =
        classify_and_export(&scripted(), &config, &mut stats, &mut log).unwrap();

    assert_eq!(summary.outcomes_seen, 5);
    assert_eq!(summary.assigned, 4);
    assert_eq!(summary.dropped, 1);
    assert_eq!(summary.shards, 3);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_non_chance_root_degenerates_to_whole_tree() {
    let dir = common::scratch_dir("export_degenerate");
    let config = ExportConfig {
        game_name: "scripted".to_string(),
        game_length: "1".to_string(),
        board_size: "test".to_string(),
        slice_count: 2,
        out_dir: dir.clone(),
    };

    let decision = scripted().child(0);
    let mut stats = Vec::new();
    let mut log = Vec::new();
    let summary =
        classify_and_export(&decision, &config, &mut stats, &mut log).unwrap();

    // No classification: no stats rows, one whole-tree file.
    assert!(stats.is_empty());
    assert_eq!(summary.outcomes_seen, 0);
    let tree = load_from_path(dir.join("scripted_outcomes.bin")).unwrap();
    assert_eq!((tree.win_first, tree.win_second), (50, 50));

    std::fs::remove_dir_all(&dir).unwrap();
}
