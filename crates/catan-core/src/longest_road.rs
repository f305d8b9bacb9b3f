//! Longest road calculation over the player-owned part of the edge graph.
//!
//! Each player's length is the longest simple path through their roads. The search
//! starts from every owned edge in both directions and backtracks over a bitset of
//! visited edges, so branches are explored one at a time and a closed loop is counted
//! once. An opponent's building on a vertex stops the path there.

use crate::board::{Board, EdgeId, PlayerId, VertexId};
use crate::rules::{bonus_holder, MIN_LONGEST_ROAD};
use std::collections::BTreeMap;

/// Visited edges for one traversal
#[derive(Debug, Clone, Copy, Default)]
struct EdgeSet(u128);

impl EdgeSet {
    fn contains(&self, edge: EdgeId) -> bool {
        self.0 & (1u128 << edge.0) != 0
    }

    fn insert(&mut self, edge: EdgeId) {
        self.0 |= 1u128 << edge.0;
    }

    fn remove(&mut self, edge: EdgeId) {
        self.0 &= !(1u128 << edge.0);
    }
}

/// Road length of every player that owns at least one road
pub fn compute_lengths(board: &Board) -> BTreeMap<PlayerId, u32> {
    let mut owners: Vec<PlayerId> = board
        .edges()
        .iter()
        .filter_map(|e| e.road.map(|r| r.owner))
        .collect();
    owners.sort_unstable();
    owners.dedup();

    owners
        .into_iter()
        .map(|player| (player, longest_path(board, player)))
        .collect()
}

/// Longest simple path through one player's roads
pub fn longest_path(board: &Board, player: PlayerId) -> u32 {
    let mut best = 0;
    for edge in board.edges() {
        if edge.road.map(|r| r.owner) != Some(player) {
            continue;
        }
        for start in edge.vertices {
            let mut visited = EdgeSet::default();
            visited.insert(edge.id);
            let length = 1 + extend(board, player, edge.other_end(start), &mut visited);
            best = best.max(length);
        }
    }
    best
}

fn extend(board: &Board, player: PlayerId, vertex: VertexId, visited: &mut EdgeSet) -> u32 {
    if board.building(vertex).is_some_and(|b| b.owner != player) {
        return 0;
    }

    let mut best = 0;
    for &edge in &board.vertices()[vertex.index()].edges {
        if visited.contains(edge) || board.road_owner(edge) != Some(player) {
            continue;
        }
        visited.insert(edge);
        let far = board.edges()[edge.index()].other_end(vertex);
        best = best.max(1 + extend(board, player, far, visited));
        visited.remove(edge);
    }
    best
}

/// Decide who holds the longest road bonus from per-player lengths in seat order
pub fn longest_road_holder(
    seats: &[PlayerId],
    lengths: &BTreeMap<PlayerId, u32>,
    current: Option<PlayerId>,
) -> Option<PlayerId> {
    let standings: Vec<(PlayerId, u32)> = seats
        .iter()
        .map(|p| (*p, lengths.get(p).copied().unwrap_or(0)))
        .collect();
    bonus_holder(&standings, MIN_LONGEST_ROAD, current)
}
