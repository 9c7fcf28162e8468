//! Forward reachability queries over a function CFG.
//!
//! The oracle is sound for safety: a `false` answer means no execution path
//! exists, a `true` answer means one may exist. Conservative `true`s cost
//! a missed rewrite, never a wrong one.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use super::use_index::UsePosition;
use crate::move_c::cpp_ast::cfg::{BlockId, Cfg};

pub struct ReachabilityOracle<'a, 'ast> {
    cfg: &'a Cfg<'ast>,
}

impl<'a, 'ast> ReachabilityOracle<'a, 'ast> {
    pub fn new(cfg: &'a Cfg<'ast>) -> Self {
        Self { cfg }
    }

    /// Can execution at `candidate` occur after execution at `current`?
    ///
    /// Within one block the element order decides; earlier or equal
    /// elements can only re-execute if the block lies on a cycle. Across
    /// blocks the question is plain forward reachability.
    pub fn can_occur_after(&self, current: &UsePosition, candidate: &UsePosition) -> bool {
        if current.block == candidate.block {
            if candidate.element > current.element {
                return true;
            }
            return self.block_can_reach_itself(current.block);
        }
        self.is_reachable(current.block, candidate.block)
    }

    /// Forward BFS over successor edges. Statically unreached successors
    /// are skipped.
    pub fn is_reachable(&self, from: BlockId, to: BlockId) -> bool {
        if from == to {
            return true;
        }

        let mut queue = VecDeque::new();
        let mut visited = FxHashSet::default();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            let Some(block) = self.cfg.block(current) else {
                continue;
            };
            for succ in &block.succs {
                if !self.cfg.is_reached(*succ) {
                    continue;
                }
                if *succ == to {
                    return true;
                }
                if visited.insert(*succ) {
                    queue.push_back(*succ);
                }
            }
        }

        false
    }

    /// Whether the block lies on a cycle, i.e. has a path through the CFG
    /// back to itself.
    pub fn block_can_reach_itself(&self, block: BlockId) -> bool {
        let Some(start) = self.cfg.block(block) else {
            return false;
        };

        let mut queue = VecDeque::new();
        let mut visited = FxHashSet::default();
        for succ in &start.succs {
            if !self.cfg.is_reached(*succ) {
                continue;
            }
            if *succ == block {
                return true;
            }
            if visited.insert(*succ) {
                queue.push_back(*succ);
            }
        }

        while let Some(current) = queue.pop_front() {
            let Some(blk) = self.cfg.block(current) else {
                continue;
            };
            for succ in &blk.succs {
                if !self.cfg.is_reached(*succ) {
                    continue;
                }
                if *succ == block {
                    return true;
                }
                if visited.insert(*succ) {
                    queue.push_back(*succ);
                }
            }
        }

        false
    }
}
