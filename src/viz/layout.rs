//! Force-directed node placement (Fruchterman–Reingold).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-iteration movement below which the layout is considered settled
const THRESHOLD: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Optimal node distance; `1/sqrt(n)` when unset
    pub k: Option<f64>,
    pub iterations: usize,
    /// Fixed seed for reproducible layouts; random when unset
    pub seed: Option<u64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            k: Some(1.0),
            iterations: 50,
            seed: None,
        }
    }
}

impl LayoutOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Position `n` nodes connected by `edges` (treated as undirected).
///
/// The result is centred on the origin and scaled so the largest coordinate
/// magnitude is 1. An empty graph yields no positions and a single node sits
/// at the origin.
pub fn spring_layout(n: usize, edges: &[(usize, usize)], options: &LayoutOptions) -> Vec<[f64; 2]> {
    match n {
        0 => return Vec::new(),
        1 => return vec![[0.0, 0.0]],
        _ => {}
    }

    let mut adjacency = vec![vec![0.0f64; n]; n];
    for &(a, b) in edges {
        if a < n && b < n && a != b {
            adjacency[a][b] = 1.0;
            adjacency[b][a] = 1.0;
        }
    }

    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<[f64; 2]> = (0..n)
        .map(|_| [rng.random::<f64>(), rng.random::<f64>()])
        .collect();

    let k = options.k.unwrap_or_else(|| (1.0 / n as f64).sqrt());

    let extent = |dim: usize, pos: &[[f64; 2]]| {
        let (lo, hi) = pos.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
            (lo.min(p[dim]), hi.max(p[dim]))
        });
        hi - lo
    };
    let mut t = extent(0, &pos).max(extent(1, &pos)) * 0.1;
    let dt = t / (options.iterations as f64 + 1.0);

    for _ in 0..options.iterations {
        let mut displacement = vec![[0.0f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = k * k / (distance * distance) - adjacency[i][j] * distance / k;
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }

        let mut moved = 0.0f64;
        for i in 0..n {
            let mut length =
                (displacement[i][0].powi(2) + displacement[i][1].powi(2)).sqrt();
            if length < 0.01 {
                length = 0.1;
            }
            let step = [displacement[i][0] * t / length, displacement[i][1] * t / length];
            pos[i][0] += step[0];
            pos[i][1] += step[1];
            moved += step[0].powi(2) + step[1].powi(2);
        }

        t -= dt;
        if moved.sqrt() / (n as f64) < THRESHOLD {
            break;
        }
    }

    rescale(&mut pos);
    pos
}

fn rescale(pos: &mut [[f64; 2]]) {
    let n = pos.len() as f64;
    for dim in 0..2 {
        let mean = pos.iter().map(|p| p[dim]).sum::<f64>() / n;
        for p in pos.iter_mut() {
            p[dim] -= mean;
        }
    }

    let lim = pos
        .iter()
        .flat_map(|p| p.iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= lim;
            p[1] /= lim;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_graphs() {
        assert!(spring_layout(0, &[], &LayoutOptions::default()).is_empty());
        assert_eq!(
            spring_layout(1, &[], &LayoutOptions::default()),
            vec![[0.0, 0.0]]
        );
    }

    #[test]
    fn test_layout_is_centred_and_scaled() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)];
        let pos = spring_layout(4, &edges, &LayoutOptions::seeded(42));

        assert_eq!(pos.len(), 4);
        let max = pos
            .iter()
            .flat_map(|p| p.iter())
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        assert!((max - 1.0).abs() < 1e-9);

        for dim in 0..2 {
            let mean: f64 = pos.iter().map(|p| p[dim]).sum::<f64>() / 4.0;
            assert!(mean.abs() < 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let edges = [(0, 1), (1, 2)];
        let a = spring_layout(3, &edges, &LayoutOptions::seeded(7));
        let b = spring_layout(3, &edges, &LayoutOptions::seeded(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_connected_nodes_sit_closer() {
        // 0-1 connected, 2 isolated
        let pos = spring_layout(
            3,
            &[(0, 1)],
            &LayoutOptions {
                k: None,
                iterations: 200,
                seed: Some(42),
            },
        );
        let dist = |a: usize, b: usize| {
            ((pos[a][0] - pos[b][0]).powi(2) + (pos[a][1] - pos[b][1]).powi(2)).sqrt()
        };
        assert!(dist(0, 1) < dist(0, 2));
        assert!(dist(0, 1) < dist(1, 2));
    }
}
