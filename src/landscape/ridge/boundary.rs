//! Plate boundary graph.
//!
//! Vertices are boundary edges: pairs of 4-adjacent voxels on different
//! plates. Two boundary edges are connected when their boundary segments
//! continue each other, either straight on or around a corner. Edges with a
//! voxel on the map border are the only places a ridge may start or end.

use std::collections::{HashMap, VecDeque};

use crate::voxel::Grid;

/// Canonical key of a boundary edge: linear indices of its two voxels,
/// smaller first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub a: usize,
    pub b: usize,
}

impl EdgeKey {
    pub fn new(i: usize, j: usize) -> Self {
        Self { a: i.min(j), b: i.max(j) }
    }
}

/// Direction of the boundary segment separating the two voxels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeAxis {
    /// Voxels share x, one above the other; the segment runs along x and the
    /// plates spread apart along y.
    Horizontal,
    /// Voxels share y, side by side; the segment runs along y and the plates
    /// spread apart along x.
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryEdge {
    pub key: EdgeKey,
    pub axis: EdgeAxis,
    /// Voxel with the smaller coordinate along the spreading axis.
    pub first: (usize, usize),
    /// Voxel with the larger coordinate along the spreading axis.
    pub second: (usize, usize),
}

impl BoundaryEdge {
    fn horizontal(grid: &Grid, x: usize, y: usize) -> Self {
        Self {
            key: EdgeKey::new(grid.index(x, y), grid.index(x, y + 1)),
            axis: EdgeAxis::Horizontal,
            first: (x, y),
            second: (x, y + 1),
        }
    }

    fn vertical(grid: &Grid, x: usize, y: usize) -> Self {
        Self {
            key: EdgeKey::new(grid.index(x, y), grid.index(x + 1, y)),
            axis: EdgeAxis::Vertical,
            first: (x, y),
            second: (x + 1, y),
        }
    }

    fn touches_border(&self, grid: &Grid) -> bool {
        grid.is_border(self.first.0, self.first.1) || grid.is_border(self.second.0, self.second.1)
    }
}

/// Boundary edges of a partitioned grid and their adjacency.
#[derive(Clone, Debug, Default)]
pub struct BoundaryGraph {
    /// Edges in scan order.
    pub edges: Vec<BoundaryEdge>,
    /// Edges touching the map border, in scan order.
    pub candidates: Vec<EdgeKey>,
    lookup: HashMap<EdgeKey, usize>,
    adjacency: HashMap<EdgeKey, Vec<EdgeKey>>,
}

impl BoundaryGraph {
    /// Extract every boundary edge of `grid` and connect them.
    pub fn build(grid: &Grid) -> Self {
        let mut graph = Self::default();

        for y in 0..grid.height {
            for x in 0..grid.width {
                let plate = grid.plate_at(x, y);
                if x + 1 < grid.width && grid.plate_at(x + 1, y) != plate {
                    graph.insert(grid, BoundaryEdge::vertical(grid, x, y));
                }
                if y + 1 < grid.height && grid.plate_at(x, y + 1) != plate {
                    graph.insert(grid, BoundaryEdge::horizontal(grid, x, y));
                }
            }
        }

        for i in 0..graph.edges.len() {
            let edge = graph.edges[i];
            let neighbors: Vec<EdgeKey> = neighbor_slots(grid, &edge)
                .into_iter()
                .flatten()
                .filter(|key| graph.lookup.contains_key(key))
                .collect();
            graph.adjacency.insert(edge.key, neighbors);
        }

        graph
    }

    fn insert(&mut self, grid: &Grid, edge: BoundaryEdge) {
        if edge.touches_border(grid) {
            self.candidates.push(edge.key);
        }
        self.lookup.insert(edge.key, self.edges.len());
        self.edges.push(edge);
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&BoundaryEdge> {
        self.lookup.get(key).map(|&i| &self.edges[i])
    }

    pub fn neighbors(&self, key: &EdgeKey) -> &[EdgeKey] {
        self.adjacency.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_candidate(&self, key: &EdgeKey) -> bool {
        self.candidates.contains(key)
    }

    /// Unweighted hop distances from `source` to every reachable edge.
    pub fn distances_from(&self, source: EdgeKey) -> HashMap<EdgeKey, u32> {
        let mut dist = HashMap::new();
        let mut queue = VecDeque::new();
        dist.insert(source, 0);
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            for &next in self.neighbors(&current) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }

        dist
    }

    /// Farthest map-edge candidate reachable in `dist`, first one on ties.
    fn farthest_candidate(&self, source: EdgeKey, dist: &HashMap<EdgeKey, u32>) -> (EdgeKey, u32) {
        let mut far = source;
        let mut far_dist = 0;
        for candidate in &self.candidates {
            if let Some(&d) = dist.get(candidate) {
                if d > far_dist {
                    far = *candidate;
                    far_dist = d;
                }
            }
        }
        (far, far_dist)
    }

    /// Longest candidate-to-candidate path found by one BFS per candidate.
    ///
    /// Each candidate is a BFS source; its farthest reachable candidate is
    /// compared against the best pair so far and only a strictly longer pair
    /// replaces it. This is a heuristic and may miss the true diameter. The
    /// path runs from the source to the far candidate. Empty if the map has no
    /// candidates at all.
    pub fn longest_path(&self) -> Vec<EdgeKey> {
        let mut best: Option<(u32, EdgeKey, HashMap<EdgeKey, u32>)> = None;

        for &source in &self.candidates {
            let dist = self.distances_from(source);
            let (far, far_dist) = self.farthest_candidate(source, &dist);
            let better = match &best {
                Some((best_dist, _, _)) => far_dist > *best_dist,
                None => true,
            };
            if better {
                best = Some((far_dist, far, dist));
            }
        }

        match best {
            Some((_, far, dist)) => self.walk_back(far, &dist),
            None => Vec::new(),
        }
    }

    /// Rebuild a shortest path ending at `target` from a BFS distance map,
    /// preferring the first neighbour one step closer to the source.
    fn walk_back(&self, target: EdgeKey, dist: &HashMap<EdgeKey, u32>) -> Vec<EdgeKey> {
        let mut path = vec![target];
        let mut current = target;
        let mut d = dist[&target];

        while d > 0 {
            let previous = self
                .neighbors(&current)
                .iter()
                .copied()
                .find(|n| dist.get(n) == Some(&(d - 1)));
            match previous {
                Some(p) => {
                    path.push(p);
                    current = p;
                    d -= 1;
                }
                None => unreachable!("BFS distance map has no predecessor for {:?}", current),
            }
        }

        path.reverse();
        path
    }
}

/// Keys of every boundary edge that could continue `edge`, whether or not the
/// edge exists. Straight continuations first, then the turns at each end.
fn neighbor_slots(grid: &Grid, edge: &BoundaryEdge) -> [Option<EdgeKey>; 6] {
    let (x, y) = (edge.first.0 as i64, edge.first.1 as i64);
    match edge.axis {
        // Segment from corner (x, y+1) to corner (x+1, y+1).
        EdgeAxis::Horizontal => [
            horizontal_key(grid, x - 1, y),
            horizontal_key(grid, x + 1, y),
            vertical_key(grid, x - 1, y),
            vertical_key(grid, x - 1, y + 1),
            vertical_key(grid, x, y),
            vertical_key(grid, x, y + 1),
        ],
        // Segment from corner (x+1, y) to corner (x+1, y+1).
        EdgeAxis::Vertical => [
            vertical_key(grid, x, y - 1),
            vertical_key(grid, x, y + 1),
            horizontal_key(grid, x, y - 1),
            horizontal_key(grid, x + 1, y - 1),
            horizontal_key(grid, x, y),
            horizontal_key(grid, x + 1, y),
        ],
    }
}

/// Key of the pair `(x, y)`–`(x, y+1)` if both cells exist.
fn horizontal_key(grid: &Grid, x: i64, y: i64) -> Option<EdgeKey> {
    if grid.in_bounds(x, y) && grid.in_bounds(x, y + 1) {
        let (x, y) = (x as usize, y as usize);
        Some(EdgeKey::new(grid.index(x, y), grid.index(x, y + 1)))
    } else {
        None
    }
}

/// Key of the pair `(x, y)`–`(x+1, y)` if both cells exist.
fn vertical_key(grid: &Grid, x: i64, y: i64) -> Option<EdgeKey> {
    if grid.in_bounds(x, y) && grid.in_bounds(x + 1, y) {
        let (x, y) = (x as usize, y as usize);
        Some(EdgeKey::new(grid.index(x, y), grid.index(x + 1, y)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plates::{partition_with_seeds, random_seeds, PlateId};
    use crate::tilemap::Tilemap;
    use crate::voxel::Voxel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid_from(width: usize, height: usize, plate: impl Fn(usize, usize) -> u8) -> Grid {
        let mut grid: Grid = Tilemap::new_with(width, height, Voxel::default());
        for (x, y, voxel) in grid.iter_mut() {
            voxel.plate = PlateId(plate(x, y));
        }
        grid
    }

    fn key_v(grid: &Grid, x: usize, y: usize) -> EdgeKey {
        EdgeKey::new(grid.index(x, y), grid.index(x + 1, y))
    }

    fn key_h(grid: &Grid, x: usize, y: usize) -> EdgeKey {
        EdgeKey::new(grid.index(x, y), grid.index(x, y + 1))
    }

    fn assert_valid_path(graph: &BoundaryGraph, path: &[EdgeKey]) {
        for pair in path.windows(2) {
            assert!(graph.neighbors(&pair[0]).contains(&pair[1]), "{:?} not adjacent", pair);
        }
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            assert!(graph.is_candidate(first));
            assert!(graph.is_candidate(last));
        }
    }

    #[test]
    fn test_single_plate_has_no_boundary() {
        let grid = grid_from(8, 8, |_, _| 0);
        let graph = BoundaryGraph::build(&grid);
        assert!(graph.is_empty());
        assert!(graph.longest_path().is_empty());
    }

    #[test]
    fn test_edges_and_axes() {
        let grid = grid_from(6, 4, |x, _| if x < 3 { 0 } else { 1 });
        let graph = BoundaryGraph::build(&grid);

        assert_eq!(graph.len(), 4);
        assert!(graph.edges.iter().all(|e| e.axis == EdgeAxis::Vertical));
        assert!(graph.edges.iter().all(|e| e.first.0 == 2 && e.second.0 == 3));
        // Only the rows on the top and bottom border are candidates.
        assert_eq!(graph.candidates, vec![key_v(&grid, 2, 0), key_v(&grid, 2, 3)]);
    }

    #[test]
    fn test_straight_boundary_path() {
        let grid = grid_from(6, 6, |x, _| if x < 3 { 0 } else { 1 });
        let graph = BoundaryGraph::build(&grid);
        let path = graph.longest_path();

        let expected: Vec<EdgeKey> = (0..6).map(|y| key_v(&grid, 2, y)).collect();
        assert_eq!(path, expected);
        assert_valid_path(&graph, &path);
    }

    #[test]
    fn test_path_turns_corner() {
        // Plate 1 fills the lower right quarter.
        let grid = grid_from(6, 6, |x, y| if x >= 3 && y >= 3 { 1 } else { 0 });
        let graph = BoundaryGraph::build(&grid);

        assert!(graph.neighbors(&key_v(&grid, 2, 3)).contains(&key_h(&grid, 3, 2)));
        assert!(graph.neighbors(&key_h(&grid, 3, 2)).contains(&key_v(&grid, 2, 3)));

        let path = graph.longest_path();
        // (5, 2) is scanned before (2, 5), so the search starts there.
        let expected = vec![
            key_h(&grid, 5, 2),
            key_h(&grid, 4, 2),
            key_h(&grid, 3, 2),
            key_v(&grid, 2, 3),
            key_v(&grid, 2, 4),
            key_v(&grid, 2, 5),
        ];
        assert_eq!(path, expected);
        assert_valid_path(&graph, &path);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let seeds = random_seeds(40, 30, 8, &mut rng);
        let plates = partition_with_seeds(40, 30, &seeds);
        let mut grid: Grid = Tilemap::new(40, 30);
        grid.apply_plate_map(&plates);

        let graph = BoundaryGraph::build(&grid);
        for edge in &graph.edges {
            for n in graph.neighbors(&edge.key) {
                assert!(graph.neighbors(n).contains(&edge.key));
                assert_ne!(*n, edge.key);
            }
        }
    }

    #[test]
    fn test_longest_path_is_valid_and_maximal() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        for _ in 0..5 {
            let seeds = random_seeds(48, 36, 7, &mut rng);
            let plates = partition_with_seeds(48, 36, &seeds);
            let mut grid: Grid = Tilemap::new(48, 36);
            grid.apply_plate_map(&plates);

            let graph = BoundaryGraph::build(&grid);
            let path = graph.longest_path();
            if graph.candidates.is_empty() {
                assert!(path.is_empty());
                continue;
            }
            assert_valid_path(&graph, &path);

            let best = graph
                .candidates
                .iter()
                .map(|&c| {
                    let dist = graph.distances_from(c);
                    graph
                        .candidates
                        .iter()
                        .filter_map(|k| dist.get(k).copied())
                        .max()
                        .unwrap_or(0)
                })
                .max()
                .unwrap_or(0);
            assert_eq!(path.len() as u32, best + 1);
        }
    }

    #[test]
    fn test_isolated_candidate_gives_trivial_path() {
        // A single cell of plate 1 in the corner: two candidate edges that
        // meet at the cell's inner corner.
        let grid = grid_from(5, 5, |x, y| if x == 0 && y == 0 { 1 } else { 0 });
        let graph = BoundaryGraph::build(&grid);
        assert_eq!(graph.len(), 2);
        let path = graph.longest_path();
        assert_eq!(path.len(), 2);
        assert_valid_path(&graph, &path);
    }
}
