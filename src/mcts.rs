//! Monte Carlo Tree Search (MCTS) implementation with RAVE.
//!
//! This module implements MCTS with:
//! - UCT-RAVE for node selection (blending direct win rates with
//!   All-Moves-As-First statistics, plus a UCT exploration bonus)
//! - Heuristically biased expansion, one child per iteration
//! - Semi-greedy playouts for value estimation
//! - Iterative backpropagation along parent links
//!
//! Nodes live in an arena (`Vec<TreeNode>`) and refer to each other by
//! index: a node owns its position, its children are owned by the arena, and
//! the parent link is a plain index. The whole tree is dropped after one
//! decision.
//!
//! A node's win total is counted for the player who moved *into* it, so a
//! parent always prefers the child with the best value for itself.

use std::collections::HashMap;
use std::time::Instant;

use fastrand::Rng;
use log::{debug, trace};

use crate::board::{Board, Move, Player, with_stone};
use crate::constants::{
    AMAF_EPSILON, AMAF_NEUTRAL, PRIOR_CRITICAL_SCALE, PRIOR_CRITICAL_VISITS, PROB_EXPAND_TOP,
    RAVE_EQUIV, REPORT_PERIOD, UCT_EXPLORATION,
};
use crate::evaluator::expansion_score;
use crate::playout::{Playout, mcplayout};
use crate::threats::ThreatCandidate;

/// Index of a node in the search arena.
pub type NodeId = usize;

/// The root is always the first node of the arena.
pub const ROOT: NodeId = 0;

/// All-Moves-As-First accumulator for one move.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AmafStats {
    pub wins: f64,
    pub visits: u32,
}

/// A node in the MCTS search tree.
pub struct TreeNode<B> {
    /// The position at this node, owned exclusively
    pub board: B,
    /// Move that produced this node (`None` for the root)
    pub mv: Option<Move>,
    /// Parent index (`None` for the root)
    pub parent: Option<NodeId>,
    /// Player to move at this node
    pub to_move: Player,
    /// Child indices, in expansion order
    pub children: Vec<NodeId>,
    /// Legal moves without a child yet
    pub untried: Vec<Move>,
    /// Number of backpropagation passes through this node
    pub visits: u32,
    /// Accumulated results for the player who moved into this node
    pub wins: f64,
    /// AMAF statistics for moves by `to_move` seen in playouts below this node
    pub amaf: HashMap<Move, AmafStats>,
}

impl<B: Board> TreeNode<B> {
    fn new(board: B, mv: Option<Move>, parent: Option<NodeId>, to_move: Player) -> Self {
        let untried = if board.winner().is_some() {
            Vec::new()
        } else {
            board.legal_moves()
        };
        Self {
            board,
            mv,
            parent,
            to_move,
            children: Vec::new(),
            untried,
            visits: 0,
            wins: 0.0,
            amaf: HashMap::new(),
        }
    }

    /// Calculate the winrate for this node.
    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.wins / self.visits as f64
        } else {
            -0.1 // Indicate unvisited
        }
    }

    /// No untried moves remain.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}

/// Arena holding every node of one search.
pub struct SearchTree<B> {
    nodes: Vec<TreeNode<B>>,
}

impl<B: Board> SearchTree<B> {
    /// Create a tree whose root is `board` with `to_move` to play.
    pub fn new(board: B, to_move: Player) -> Self {
        Self {
            nodes: vec![TreeNode::new(board, None, None, to_move)],
        }
    }

    #[inline]
    pub fn root(&self) -> &TreeNode<B> {
        &self.nodes[ROOT]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TreeNode<B> {
        &self.nodes[id]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = &TreeNode<B>> {
        self.nodes[id].children.iter().map(|&c| &self.nodes[c])
    }

    /// Seed the root's AMAF table with pseudo-visits for critical moves.
    ///
    /// A move listed several times keeps its highest priority.
    pub fn seed_root_priors(&mut self, candidates: &[ThreatCandidate]) {
        let root = &mut self.nodes[ROOT];
        for c in candidates {
            let strength = (c.priority as f64 / PRIOR_CRITICAL_SCALE).min(1.0);
            let prior = AmafStats {
                wins: strength * PRIOR_CRITICAL_VISITS as f64,
                visits: PRIOR_CRITICAL_VISITS,
            };
            root.amaf
                .entry(c.mv)
                .and_modify(|s| {
                    if prior.wins > s.wins {
                        *s = prior;
                    }
                })
                .or_insert(prior);
        }
    }
}

/// Compute the UCT-RAVE urgency of `child` as seen from `parent`.
///
/// `beta = sqrt(k / (3v + k))` moves the weight from the AMAF estimate to the
/// direct win rate as the child collects visits. Unvisited children are
/// always tried first.
fn rave_urgency<B>(parent: &TreeNode<B>, child: &TreeNode<B>) -> f64 {
    if child.visits == 0 {
        return f64::INFINITY;
    }

    let v = child.visits as f64;
    let exploit = child.wins / v;
    let beta = (RAVE_EQUIV / (3.0 * v + RAVE_EQUIV)).sqrt();
    let amaf = child
        .mv
        .and_then(|mv| parent.amaf.get(&mv))
        .filter(|s| s.visits > 0)
        .map_or(AMAF_NEUTRAL, |s| s.wins / (s.visits as f64 + AMAF_EPSILON));
    let explore = UCT_EXPLORATION * ((parent.visits as f64).ln() / v).sqrt();

    (1.0 - beta) * exploit + beta * amaf + explore
}

/// Select the child with the highest urgency score; the first one wins ties.
fn most_urgent<B>(tree: &SearchTree<B>, id: NodeId) -> NodeId {
    let parent = &tree.nodes[id];
    let mut best = parent.children[0];
    let mut best_urgency = f64::NEG_INFINITY;
    for &c in &parent.children {
        let urgency = rave_urgency(parent, &tree.nodes[c]);
        if urgency > best_urgency {
            best = c;
            best_urgency = urgency;
        }
    }
    best
}

/// Descend from the root to the node to grow.
///
/// Stops at the first node that still has untried moves or has no children.
fn tree_descend<B: Board>(tree: &SearchTree<B>) -> NodeId {
    let mut id = ROOT;
    loop {
        let node = &tree.nodes[id];
        if node.children.is_empty() || !node.is_fully_expanded() {
            return id;
        }
        id = most_urgent(tree, id);
    }
}

/// Expand a node by one untried move.
///
/// Untried moves are ranked by [`expansion_score`]; most of the time the
/// pick is uniform over the top third, otherwise uniform over all of them.
/// Returns the new child, or `id` itself when nothing can be expanded.
pub fn expand<B: Board>(tree: &mut SearchTree<B>, id: NodeId, rng: &mut Rng) -> NodeId {
    let node = &tree.nodes[id];
    if node.untried.is_empty() {
        return id;
    }

    let mut scored: Vec<(f64, usize)> = node
        .untried
        .iter()
        .enumerate()
        .map(|(i, &mv)| (expansion_score(&node.board, mv, node.to_move), i))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let pick = if rng.f64() < PROB_EXPAND_TOP {
        rng.usize(..(scored.len() / 3).max(1))
    } else {
        rng.usize(..scored.len())
    };
    let untried_idx = scored[pick].1;

    let node = &mut tree.nodes[id];
    let mv = node.untried.remove(untried_idx);
    let to_move = node.to_move;
    let Some(board) = with_stone(&node.board, mv, to_move) else {
        return id;
    };

    let child_id = tree.nodes.len();
    tree.nodes
        .push(TreeNode::new(board, Some(mv), Some(id), to_move.opponent()));
    tree.nodes[id].children.push(child_id);
    child_id
}

/// Evaluate a freshly selected node: either its known game result, or a
/// playout from it.
fn evaluate<B: Board>(tree: &SearchTree<B>, id: NodeId, rng: &mut Rng) -> Playout {
    let node = &tree.nodes[id];
    let perspective = node.to_move.opponent();
    match node.board.winner() {
        Some(winner) => Playout {
            result: if winner == perspective { 1.0 } else { 0.0 },
            moves: Vec::new(),
        },
        None => mcplayout(&node.board, node.to_move, perspective, rng),
    }
}

/// Update tree statistics after a playout.
///
/// Walks parent links from `leaf` to the root. Every node gets a visit and
/// the result; each parent also records AMAF statistics for the playout
/// moves its own player made that are still open in its position. The result
/// flips at every level since players alternate.
fn tree_update<B: Board>(
    tree: &mut SearchTree<B>,
    leaf: NodeId,
    mut result: f64,
    moves: &[(Player, Move)],
) {
    let mut id = leaf;
    loop {
        let node = &mut tree.nodes[id];
        node.visits += 1;
        node.wins += result;

        let Some(parent_id) = node.parent else {
            break;
        };
        let parent = &mut tree.nodes[parent_id];
        for &(player, mv) in moves {
            if player == parent.to_move && parent.board.is_empty_cell(mv) {
                let stats = parent.amaf.entry(mv).or_default();
                stats.wins += result;
                stats.visits += 1;
            }
        }

        result = 1.0 - result;
        id = parent_id;
    }
}

/// Run MCTS from the tree's root until `deadline`, or until
/// `max_iterations` iterations when given.
///
/// Returns the most-visited root child's move, or `None` when the search
/// never expanded the root.
pub fn tree_search<B: Board>(
    tree: &mut SearchTree<B>,
    deadline: Instant,
    max_iterations: Option<usize>,
    rng: &mut Rng,
) -> Option<Move> {
    let mut iterations = 0;

    while max_iterations.is_none_or(|cap| iterations < cap) && Instant::now() < deadline {
        let selected = tree_descend(tree);
        let leaf = if tree.nodes[selected].board.winner().is_some() {
            selected
        } else {
            expand(tree, selected, rng)
        };

        let playout = evaluate(tree, leaf, rng);
        tree_update(tree, leaf, playout.result, &playout.moves);

        iterations += 1;
        if iterations % REPORT_PERIOD == 0 {
            trace!(
                "{iterations} iterations, {} nodes, root winrate {:.3}",
                tree.len(),
                best_child(tree).map_or(0.0, |c| c.winrate())
            );
        }
    }

    debug!(
        "search finished: {iterations} iterations, {} nodes, {} root children",
        tree.len(),
        tree.root().children.len()
    );
    best_move(tree)
}

/// The most-visited child of the root; the first one wins ties.
fn best_child<B: Board>(tree: &SearchTree<B>) -> Option<&TreeNode<B>> {
    // `max_by_key` keeps the last maximum, so scan in reverse.
    tree.children(ROOT).rev().max_by_key(|c| c.visits)
}

/// Find the best move (most visited child).
pub fn best_move<B: Board>(tree: &SearchTree<B>) -> Option<Move> {
    best_child(tree).and_then(|c| c.mv)
}

/// Log statistics for the root's children.
pub fn dump_children<B: Board>(tree: &SearchTree<B>) {
    for child in tree.children(ROOT) {
        if let Some((r, c)) = child.mv {
            debug!(
                "move ({r}, {c}) v={} w={:.1} wr={:.3}",
                child.visits,
                child.wins,
                child.winrate()
            );
        }
    }
}
