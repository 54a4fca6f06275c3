//! Generic breadth-first search shared by the puzzles.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use tracing::{debug, instrument};

/// A search problem with deterministic, ordered successors.
///
/// Successor order matters: among equally short solutions the search
/// returns the one whose actions come first in this order.
pub trait Problem {
    /// A node's state.
    type State: Clone + Eq + Hash;
    /// The step that leads from one state to the next.
    type Action: Clone;

    /// State the search starts from.
    fn initial(&self) -> Self::State;

    /// Whether `state` solves the problem.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Legal `(action, next_state)` pairs from `state`, in preference order.
    fn successors(&self, state: &Self::State) -> Vec<(Self::Action, Self::State)>;
}

/// How the frontier treats states it has already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Plain tree search. Revisits states, so it may run forever on
    /// unsolvable problems unless a depth limit is given.
    Tree,
    /// Graph search. Each state is generated at most once.
    Graph,
}

struct Node<S, A> {
    state: S,
    parent: Option<usize>,
    action: Option<A>,
    depth: usize,
}

/// Breadth-first search returning the action sequence to the shallowest goal.
///
/// The goal test runs when a node is generated. Nodes at `max_depth` are not
/// expanded. Returns `None` when the frontier empties without a goal.
#[instrument(skip(problem))]
pub fn breadth_first<P: Problem>(
    problem: &P,
    mode: SearchMode,
    max_depth: Option<usize>,
) -> Option<Vec<P::Action>> {
    let start = problem.initial();
    if problem.is_goal(&start) {
        return Some(Vec::new());
    }

    let mut nodes = vec![Node {
        state: start.clone(),
        parent: None,
        action: None,
        depth: 0,
    }];
    let mut frontier = VecDeque::from([0usize]);
    let mut seen = HashSet::from([start]);

    while let Some(index) = frontier.pop_front() {
        let depth = nodes[index].depth;
        if max_depth.is_some_and(|limit| depth >= limit) {
            continue;
        }
        let parent_state = nodes[index].state.clone();
        for (action, state) in problem.successors(&parent_state) {
            if mode == SearchMode::Graph && !seen.insert(state.clone()) {
                continue;
            }
            let goal = problem.is_goal(&state);
            nodes.push(Node {
                state,
                parent: Some(index),
                action: Some(action),
                depth: depth + 1,
            });
            let child = nodes.len() - 1;
            if goal {
                debug!(generated = nodes.len(), depth = depth + 1, "Goal found");
                return Some(path_to(&nodes, child));
            }
            frontier.push_back(child);
        }
    }

    debug!(generated = nodes.len(), "Frontier exhausted");
    None
}

fn path_to<S, A: Clone>(nodes: &[Node<S, A>], mut index: usize) -> Vec<A> {
    let mut actions = Vec::new();
    while let Some(parent) = nodes[index].parent {
        if let Some(action) = &nodes[index].action {
            actions.push(action.clone());
        }
        index = parent;
    }
    actions.reverse();
    actions
}
