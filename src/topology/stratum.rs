//! Stratum computation: heights, depths and strata layers for a directed
//! acyclic topology.
//!
//! Cells sit at the sources of the incidence DAG and vertices at the sinks,
//! so strata are grouped by *depth*: `strata[0]` holds the vertices and
//! `strata[diameter]` the cells. Cyclic input is rejected instead of being
//! silently mis-stratified.

use hashbrown::HashMap;

use crate::error::MeshCoordsError;
use crate::topology::sieve::Sieve;

/// Precomputed stratum information for a DAG of points `P`.
#[derive(Clone, Debug)]
pub struct StrataCache<P> {
    /// Distance from the sources (points with no incoming arrows).
    pub height: HashMap<P, u32>,
    /// Distance to the sinks (points with no outgoing arrows).
    pub depth: HashMap<P, u32>,
    /// Points grouped by depth, each layer sorted ascending: `strata[d]`.
    pub strata: Vec<Vec<P>>,
    /// Maximum depth observed (number of layers minus one).
    pub diameter: u32,
}

impl<P: Copy + Eq + std::hash::Hash + Ord> StrataCache<P> {
    /// Points at depth `d`, sorted ascending; empty if `d` exceeds the diameter.
    pub fn depth_stratum(&self, d: u32) -> &[P] {
        self.strata.get(d as usize).map_or(&[], Vec::as_slice)
    }
}

/// Build heights, depths and depth-strata for any [`Sieve`].
///
/// # Errors
/// Returns `Err(CycleDetected)` if the incidence relation is not a DAG.
pub fn compute_strata<S>(sieve: &S) -> Result<StrataCache<S::Point>, MeshCoordsError>
where
    S: Sieve + ?Sized,
    S::Point: Copy + Eq + std::hash::Hash + Ord,
{
    // Kahn topological sort over the cone direction.
    let mut in_deg: HashMap<S::Point, usize> = HashMap::new();
    for p in sieve.points() {
        in_deg.entry(p).or_insert(0);
        for (q, _) in sieve.cone(p) {
            *in_deg.entry(q).or_insert(0) += 1;
        }
    }
    let total = in_deg.len();
    let mut stack: Vec<_> = in_deg
        .iter()
        .filter(|&(_, &d)| d == 0)
        .map(|(&p, _)| p)
        .collect();
    let mut topo = Vec::with_capacity(total);
    while let Some(p) = stack.pop() {
        topo.push(p);
        for (q, _) in sieve.cone(p) {
            let deg = in_deg
                .get_mut(&q)
                .expect("cone target seen during degree counting");
            *deg -= 1;
            if *deg == 0 {
                stack.push(q);
            }
        }
    }
    if topo.len() != total {
        return Err(MeshCoordsError::CycleDetected);
    }

    // height[p] = 1 + max(height of predecessors), walking in topo order.
    let mut height: HashMap<S::Point, u32> = HashMap::with_capacity(total);
    for &p in &topo {
        let h = sieve
            .support(p)
            .map(|(pred, _)| height.get(&pred).copied().unwrap_or(0))
            .max()
            .map_or(0, |m| m + 1);
        height.insert(p, h);
    }

    // depth[p] = 1 + max(depth of successors), walking in reverse topo order.
    let mut depth: HashMap<S::Point, u32> = HashMap::with_capacity(total);
    for &p in topo.iter().rev() {
        let d = sieve
            .cone(p)
            .map(|(succ, _)| depth.get(&succ).copied().unwrap_or(0))
            .max()
            .map_or(0, |m| m + 1);
        depth.insert(p, d);
    }

    let diameter = depth.values().copied().max().unwrap_or(0);
    let mut strata = vec![Vec::new(); (diameter + 1) as usize];
    for (&p, &d) in &depth {
        strata[d as usize].push(p);
    }
    for layer in &mut strata {
        layer.sort_unstable();
    }

    Ok(StrataCache {
        height,
        depth,
        strata,
        diameter,
    })
}
