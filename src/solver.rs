use std::collections::{HashSet, VecDeque};

use crate::board::{ALL_DIRECTIONS, Board, Direction};
use crate::deadlocks::is_deadlocked;
use crate::signature::Signature;

/// Outcome of a search. `Cutoff` means the node budget ran out before the
/// search reached a verdict; unlike `Unsolvable` it says nothing about
/// whether a solution exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Solved(Vec<Direction>),
    Unsolvable,
    Cutoff,
}

// Back-pointer into the node arena; the root carries no parent. Boards are
// not stored here: once a state has been expanded, only its place in the
// predecessor chain is needed.
struct Node {
    parent: Option<(usize, Direction)>,
}

pub struct Solver {
    max_nodes: usize,
    prune_deadlocks: bool,
    nodes_explored: usize,
}

impl Solver {
    pub fn new(max_nodes: usize, prune_deadlocks: bool) -> Self {
        Solver {
            max_nodes,
            prune_deadlocks,
            nodes_explored: 0,
        }
    }

    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }

    /// Breadth-first search over the move graph. The fixed direction order
    /// and FIFO expansion make the first solution found minimal in move
    /// count, and make repeated runs return identical sequences.
    pub fn solve(&mut self, start: &Board) -> SolveResult {
        self.nodes_explored = 0;

        let mut arena = vec![Node { parent: None }];
        let mut frontier: VecDeque<(usize, Board)> = VecDeque::new();
        let mut visited: HashSet<Signature> = HashSet::new();

        visited.insert(Signature::of(start));
        frontier.push_back((0, start.clone()));

        while let Some((index, board)) = frontier.pop_front() {
            if self.nodes_explored >= self.max_nodes {
                return SolveResult::Cutoff;
            }
            self.nodes_explored += 1;

            if board.is_solved() {
                return SolveResult::Solved(reconstruct(&arena, index));
            }

            for dir in ALL_DIRECTIONS {
                let Some(successor) = board.try_move(dir) else {
                    continue;
                };
                if !visited.insert(Signature::of(&successor)) {
                    continue;
                }
                // Dead positions stay in the visited set so transposed
                // move orders cannot re-derive them, but they are never
                // expanded.
                if self.prune_deadlocks && is_deadlocked(&successor) {
                    continue;
                }
                arena.push(Node {
                    parent: Some((index, dir)),
                });
                frontier.push_back((arena.len() - 1, successor));
            }
            // `board` is dropped here; the solution path survives through
            // the arena's parent links alone.
        }

        SolveResult::Unsolvable
    }
}

/// Walk the predecessor chain from a solved node back to the root,
/// collecting the move that produced each state, then reverse.
fn reconstruct(arena: &[Node], mut index: usize) -> Vec<Direction> {
    let mut moves = Vec::new();
    while let Some((parent, dir)) = arena[index].parent {
        moves.push(dir);
        index = parent;
    }
    moves.reverse();
    moves
}
