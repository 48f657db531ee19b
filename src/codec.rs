//! Binary persistence for aggregate trees.
//!
//! Each node is written depth-first, parent before children, in two
//! phases: the three counters (`i32` little-endian), the child count
//! (`u64` little-endian), then the complete key array (`i32`
//! little-endian each, in the node's iteration order), and only then the
//! full recursive payload of every child in that same order.
//!
//! The stream carries no header, no version tag and no endianness
//! marker; readers and writers must agree on the layout byte for byte,
//! and any structural change to the node shape silently breaks old
//! images. Truncated or malformed input is a fatal read error; no
//! partial tree is ever returned.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::BalanceResult;
use crate::game::ActionId;
use crate::outcome_tree::OutcomeNode;

/// Serialize `node` and its whole subtree into `out`.
pub fn save<W: Write>(node: &OutcomeNode, out: &mut W) -> BalanceResult<()> {
    out.write_i32::<LittleEndian>(node.win_first)?;
    out.write_i32::<LittleEndian>(node.win_second)?;
    out.write_i32::<LittleEndian>(node.draws)?;
    out.write_u64::<LittleEndian>(node.children.len() as u64)?;
    for key in node.children.keys() {
        out.write_i32::<LittleEndian>(*key)?;
    }
    for child in node.children.values() {
        save(child, out)?;
    }
    Ok(())
}

/// Reconstruct a tree from `input`. Fails on any short read.
pub fn load<R: Read>(input: &mut R) -> BalanceResult<OutcomeNode> {
    let mut node = OutcomeNode::default();
    node.win_first = input.read_i32::<LittleEndian>()?;
    node.win_second = input.read_i32::<LittleEndian>()?;
    node.draws = input.read_i32::<LittleEndian>()?;

    let child_count = input.read_u64::<LittleEndian>()?;
    let mut keys: Vec<ActionId> = Vec::new();
    for _ in 0..child_count {
        keys.push(input.read_i32::<LittleEndian>()?);
    }
    for key in keys {
        node.children.insert(key, load(input)?);
    }
    Ok(node)
}

/// Serialize `node` to a file, buffered.
pub fn save_to_path<P: AsRef<Path>>(node: &OutcomeNode, path: P) -> BalanceResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    save(node, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Load a tree from a file, buffered.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> BalanceResult<OutcomeNode> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    load(&mut reader)
}
