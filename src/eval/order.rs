//! Topological evaluation order over the attribute arena.

use std::collections::HashSet;

use crate::model::{AttIdx, Model};

/// Computes the evaluation order of the subtree rooted at `start`.
///
/// The order is a post-order over the dependency structure: every
/// attribute's inputs (or, for a linked attribute, its link target) appear
/// before it, each attribute appears exactly once, and `start` comes last.
/// Pruned attributes stay in the order but their subtrees do not; they are
/// evaluated as if basic.
pub fn evaluation_order(model: &Model, start: AttIdx, prune: &HashSet<AttIdx>) -> Vec<AttIdx> {
    enum Frame {
        Enter(AttIdx),
        Emit(AttIdx),
    }
    let mut order = Vec::new();
    let mut done: HashSet<AttIdx> = HashSet::new();
    let mut stack = vec![Frame::Enter(start)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(idx) => {
                if done.contains(&idx) {
                    continue;
                }
                stack.push(Frame::Emit(idx));
                if !prune.contains(&idx) {
                    let att = model.attribute(idx);
                    if let Some(link) = att.link() {
                        stack.push(Frame::Enter(link));
                    } else {
                        for &input in att.inputs().iter().rev() {
                            stack.push(Frame::Enter(input));
                        }
                    }
                }
            }
            Frame::Emit(idx) => {
                if done.insert(idx) {
                    order.push(idx);
                }
            }
        }
    }
    order
}
