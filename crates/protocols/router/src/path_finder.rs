//! Path Finding
//!
//! Breadth-first search over the token graph induced by the pool registry.
//! Nodes are tokens, edges are pools connecting two tokens.

use std::collections::{HashMap, HashSet, VecDeque};

use amm::PoolStore;
use dex_core::PoolId;
use tracing::debug;

/// An edge in the token graph: the pool reaching `token_out`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub pool_id: PoolId,
    pub token_out: String,
}

/// Adjacency-list token graph.
#[derive(Debug, Clone, Default)]
pub struct TokenGraph {
    pub adjacency: HashMap<String, Vec<GraphEdge>>,
    pub pool_count: usize,
}

impl TokenGraph {
    pub fn neighbors(&self, token: &str) -> &[GraphEdge] {
        self.adjacency.get(token).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Build the token graph from every pool in the store.
///
/// Edges are added in pool creation order so searches are deterministic.
pub fn build_token_graph(store: &PoolStore) -> TokenGraph {
    let mut adjacency: HashMap<String, Vec<GraphEdge>> = HashMap::new();
    let mut pool_count = 0;

    for pool in store.pools() {
        adjacency
            .entry(pool.token_a.clone())
            .or_default()
            .push(GraphEdge {
                pool_id: pool.id.clone(),
                token_out: pool.token_b.clone(),
            });
        adjacency
            .entry(pool.token_b.clone())
            .or_default()
            .push(GraphEdge {
                pool_id: pool.id.clone(),
                token_out: pool.token_a.clone(),
            });
        pool_count += 1;
    }

    TokenGraph {
        adjacency,
        pool_count,
    }
}

/// Find all acyclic token paths from `source_token` to `target_token`, up to
/// `max_hops` edges.
///
/// The search is exhaustive: every qualifying path is returned, shortest
/// first. `max_routes` caps collection at the first N paths found.
pub fn find_paths(
    graph: &TokenGraph,
    source_token: &str,
    target_token: &str,
    max_hops: usize,
    max_routes: Option<usize>,
) -> Vec<Vec<String>> {
    let mut results: Vec<Vec<String>> = Vec::new();
    if max_hops == 0 || source_token == target_token {
        return results;
    }

    type SearchState = (String, Vec<String>, HashSet<String>);
    let mut queue: VecDeque<SearchState> = VecDeque::new();

    let mut initial_visited = HashSet::new();
    initial_visited.insert(source_token.to_string());
    queue.push_back((
        source_token.to_string(),
        vec![source_token.to_string()],
        initial_visited,
    ));

    while let Some((current, path, visited)) = queue.pop_front() {
        let hops_so_far = path.len() - 1;

        for edge in graph.neighbors(&current) {
            if visited.contains(&edge.token_out) {
                continue;
            }

            if edge.token_out == target_token {
                let mut complete_path = path.clone();
                complete_path.push(edge.token_out.clone());
                results.push(complete_path);

                if max_routes.is_some_and(|cap| results.len() >= cap) {
                    debug!("Path cap {} reached", results.len());
                    return results;
                }
            } else if hops_so_far + 1 < max_hops {
                let mut new_visited = visited.clone();
                new_visited.insert(edge.token_out.clone());
                let mut new_path = path.clone();
                new_path.push(edge.token_out.clone());
                queue.push_back((edge.token_out.clone(), new_path, new_visited));
            }
        }
    }

    debug!(
        "Found {} paths {} -> {} (max {} hops)",
        results.len(),
        source_token,
        target_token,
        max_hops
    );
    results
}
