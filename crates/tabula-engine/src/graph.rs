//! Reverse reference graph between cells.
//!
//! Edges point from a referenced cell to its referrers: `refs_from[q]` is the
//! set of cells whose formula mentions `q`. The engine keeps this in step
//! with cell edits so cycle detection and cache invalidation can walk
//! "who depends on me" directly.

use std::collections::{HashMap, HashSet};

use tabula_formula::Position;

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    refs_from: HashMap<Position, HashSet<Position>>,
}

impl DependencyGraph {
    pub fn new() -> DependencyGraph {
        DependencyGraph::default()
    }

    /// Cells whose formula references `pos`.
    pub fn referrers(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.refs_from.get(&pos).into_iter().flatten().copied()
    }

    /// Record that the formula at `referrer` mentions `referenced`.
    pub fn add_edge(&mut self, referenced: Position, referrer: Position) {
        self.refs_from.entry(referenced).or_default().insert(referrer);
    }

    /// Forget that the formula at `referrer` mentions `referenced`. A key
    /// whose referrer set empties is removed outright.
    pub fn remove_edge(&mut self, referenced: Position, referrer: Position) {
        if let Some(referrers) = self.refs_from.get_mut(&referenced) {
            referrers.remove(&referrer);
            if referrers.is_empty() {
                self.refs_from.remove(&referenced);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.refs_from.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Position {
        Position::from_a1(name).unwrap()
    }

    #[test]
    fn add_and_list_referrers() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(pos("B1"), pos("A1"));
        graph.add_edge(pos("B1"), pos("A2"));
        graph.add_edge(pos("B1"), pos("A2"));

        let mut referrers: Vec<Position> = graph.referrers(pos("B1")).collect();
        referrers.sort_unstable();
        assert_eq!(referrers, vec![pos("A1"), pos("A2")]);
        assert_eq!(graph.referrers(pos("C1")).count(), 0);
    }

    #[test]
    fn remove_edge_drops_empty_sets() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(pos("B1"), pos("A1"));
        graph.add_edge(pos("B1"), pos("A2"));

        graph.remove_edge(pos("B1"), pos("A1"));
        assert_eq!(graph.referrers(pos("B1")).count(), 1);
        assert!(!graph.refs_from.is_empty());

        graph.remove_edge(pos("B1"), pos("A2"));
        // No empty value-sets are ever kept around.
        assert!(graph.refs_from.is_empty());

        // Removing a missing edge is a no-op.
        graph.remove_edge(pos("B1"), pos("A2"));
        assert!(graph.is_empty());
    }
}
