//! Sieve: bidirectional incidence relation over mesh points.
//!
//! The `Sieve` trait models mesh connectivity as a directed multimap with
//! forward (`cone`) and backward (`support`) incidence, plus default graph
//! traversals (`closure`, `star`). `InMemorySieve` is the in-memory
//! implementation used throughout the crate, with lazily cached strata.

use hashbrown::HashMap;
use once_cell::sync::OnceCell;

use crate::error::MeshCoordsError;
use crate::topology::stratum::{StrataCache, compute_strata};

/// Directed incidence relation (arrows) over mesh points.
///
/// - **Forward** incidence (`cone`): outgoing arrows from a point, e.g.
///   cell → its vertices.
/// - **Backward** incidence (`support`): incoming arrows to a point.
pub trait Sieve {
    /// Mesh point type (e.g. [`PointId`](crate::topology::point::PointId)).
    type Point: Copy + Eq + std::hash::Hash;
    /// Payload attached to each arrow (orientation, weights, …).
    type Payload;
    /// Iterator over `(dst, &payload)` for each arrow `p -> dst`.
    type ConeIter<'a>: Iterator<Item = (Self::Point, &'a Self::Payload)>
    where
        Self: 'a;
    /// Iterator over `(src, &payload)` for each arrow `src -> p`.
    type SupportIter<'a>: Iterator<Item = (Self::Point, &'a Self::Payload)>
    where
        Self: 'a;

    /// All outgoing arrows from `p`.
    fn cone<'a>(&'a self, p: Self::Point) -> Self::ConeIter<'a>;

    /// All incoming arrows to `p`.
    fn support<'a>(&'a self, p: Self::Point) -> Self::SupportIter<'a>;

    /// Insert a new arrow `src -> dst` with the given payload.
    fn add_arrow(&mut self, src: Self::Point, dst: Self::Point, payload: Self::Payload);

    /// Every point that appears as an arrow endpoint or was added explicitly.
    fn points(&self) -> impl Iterator<Item = Self::Point> + '_;

    /// Transitive hull following `cone` arrows from `seeds`; yields each
    /// reachable point once.
    fn closure<'s>(
        &'s self,
        seeds: impl IntoIterator<Item = Self::Point>,
    ) -> impl Iterator<Item = Self::Point> + 's {
        use hashbrown::HashSet;
        let mut stack: Vec<_> = seeds.into_iter().collect();
        let mut seen: HashSet<Self::Point> = stack.iter().copied().collect();
        std::iter::from_fn(move || {
            let p = stack.pop()?;
            for (q, _) in self.cone(p) {
                if seen.insert(q) {
                    stack.push(q);
                }
            }
            Some(p)
        })
    }

    /// Transitive hull following `support` arrows from `seeds`.
    fn star<'s>(
        &'s self,
        seeds: impl IntoIterator<Item = Self::Point>,
    ) -> impl Iterator<Item = Self::Point> + 's {
        use hashbrown::HashSet;
        let mut stack: Vec<_> = seeds.into_iter().collect();
        let mut seen: HashSet<Self::Point> = stack.iter().copied().collect();
        std::iter::from_fn(move || {
            let p = stack.pop()?;
            for (q, _) in self.support(p) {
                if seen.insert(q) {
                    stack.push(q);
                }
            }
            Some(p)
        })
    }
}

/// In-memory [`Sieve`] backed by hash maps, with a lazily computed strata
/// cache that is invalidated on every mutation.
#[derive(Clone, Debug)]
pub struct InMemorySieve<P, T = ()> {
    /// Outgoing arrows: src -> [(dst, payload), …].
    adjacency_out: HashMap<P, Vec<(P, T)>>,
    /// Incoming arrows: dst -> [(src, payload), …].
    adjacency_in: HashMap<P, Vec<(P, T)>>,
    /// Cached stratification; dropped on mutation.
    strata: OnceCell<StrataCache<P>>,
}

impl<P: Copy + Eq + std::hash::Hash, T> Default for InMemorySieve<P, T> {
    fn default() -> Self {
        Self {
            adjacency_out: HashMap::new(),
            adjacency_in: HashMap::new(),
            strata: OnceCell::new(),
        }
    }
}

impl<P: Copy + Eq + std::hash::Hash, T: Clone> InMemorySieve<P, T> {
    /// Create an empty sieve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sieve from `(src, dst, payload)` triples.
    pub fn from_arrows<I: IntoIterator<Item = (P, P, T)>>(arrows: I) -> Self {
        let mut sieve = Self::default();
        for (src, dst, payload) in arrows {
            sieve.add_arrow(src, dst, payload);
        }
        sieve
    }

    /// Register `p` as a point even if no arrow touches it yet.
    pub fn add_point(&mut self, p: P) {
        self.adjacency_out.entry(p).or_default();
        self.adjacency_in.entry(p).or_default();
        self.strata = OnceCell::new();
    }

    /// Number of distinct points.
    pub fn point_count(&self) -> usize {
        // The out/in key sets overlap, so count through a set.
        let set: hashbrown::HashSet<P> = self
            .adjacency_out
            .keys()
            .chain(self.adjacency_in.keys())
            .copied()
            .collect();
        set.len()
    }
}

impl<P: Copy + Ord + Eq + std::hash::Hash, T: Clone> InMemorySieve<P, T> {
    /// Sort every adjacency list so cones and supports iterate in ascending
    /// point order regardless of insertion order.
    pub fn sort_adjacency(&mut self) {
        for v in self.adjacency_out.values_mut() {
            v.sort_unstable_by_key(|(p, _)| *p);
        }
        for v in self.adjacency_in.values_mut() {
            v.sort_unstable_by_key(|(p, _)| *p);
        }
    }

    /// Strata cache for this sieve, computing it on first use.
    ///
    /// # Errors
    /// Returns `Err(CycleDetected)` if the incidence relation is not a DAG.
    pub fn strata_cache(&self) -> Result<&StrataCache<P>, MeshCoordsError> {
        self.strata.get_or_try_init(|| compute_strata(self))
    }
}

type AdjacencyIter<'a, P, T> =
    std::iter::Map<std::slice::Iter<'a, (P, T)>, fn(&'a (P, T)) -> (P, &'a T)>;

fn entry_ref<P: Copy, T>((p, payload): &(P, T)) -> (P, &T) {
    (*p, payload)
}

impl<P: Copy + Eq + std::hash::Hash, T: Clone> Sieve for InMemorySieve<P, T> {
    type Point = P;
    type Payload = T;
    type ConeIter<'a>
        = AdjacencyIter<'a, P, T>
    where
        Self: 'a;
    type SupportIter<'a>
        = AdjacencyIter<'a, P, T>
    where
        Self: 'a;

    fn cone<'a>(&'a self, p: P) -> Self::ConeIter<'a> {
        let f: fn(&(P, T)) -> (P, &T) = entry_ref::<P, T>;
        self.adjacency_out
            .get(&p)
            .map(|v| v.iter().map(f))
            .unwrap_or_else(|| [].iter().map(f))
    }

    fn support<'a>(&'a self, p: P) -> Self::SupportIter<'a> {
        let f: fn(&(P, T)) -> (P, &T) = entry_ref::<P, T>;
        self.adjacency_in
            .get(&p)
            .map(|v| v.iter().map(f))
            .unwrap_or_else(|| [].iter().map(f))
    }

    fn add_arrow(&mut self, src: P, dst: P, payload: T) {
        self.adjacency_out
            .entry(src)
            .or_default()
            .push((dst, payload.clone()));
        self.adjacency_in.entry(dst).or_default().push((src, payload));
        self.adjacency_out.entry(dst).or_default();
        self.adjacency_in.entry(src).or_default();
        self.strata = OnceCell::new();
    }

    fn points(&self) -> impl Iterator<Item = P> + '_ {
        let mut seen: hashbrown::HashSet<P> = hashbrown::HashSet::new();
        self.adjacency_out
            .keys()
            .chain(self.adjacency_in.keys())
            .copied()
            .filter(move |p| seen.insert(*p))
    }
}
