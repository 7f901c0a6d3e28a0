//! Flat storage for recombining binomial trees.

/// Recombining tree stored as one flat vector.
///
/// Node `(step, downs)` with `downs <= step` lives at
/// `step * (step + 1) / 2 + downs`. A tree with `n` steps holds `n + 1`
/// layers and `(n + 1)(n + 2) / 2` nodes.
///
/// # Examples
/// ```
/// use pricer_models::lattice::TriangularLattice;
///
/// let mut tree = TriangularLattice::new(2, 0.0_f64);
/// tree.set(2, 1, 5.0);
/// assert_eq!(tree.get(2, 1), Some(5.0));
/// assert_eq!(tree.layer(2), &[0.0, 5.0, 0.0]);
/// assert_eq!(tree.get(1, 2), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TriangularLattice<T> {
    steps: usize,
    nodes: Vec<T>,
}

#[inline]
fn idx(step: usize, downs: usize) -> usize {
    step * (step + 1) / 2 + downs
}

impl<T: Copy> TriangularLattice<T> {
    /// Tree with `steps` steps, every node set to `fill`.
    pub fn new(steps: usize, fill: T) -> Self {
        Self {
            steps,
            nodes: vec![fill; idx(steps + 1, 0)],
        }
    }

    /// Tree with every node computed from its `(step, downs)` coordinates.
    pub fn from_fn<F>(steps: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut nodes = Vec::with_capacity(idx(steps + 1, 0));
        for step in 0..=steps {
            for downs in 0..=step {
                nodes.push(f(step, downs));
            }
        }
        Self { steps, nodes }
    }

    /// Number of steps (one less than the number of layers).
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Total node count.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Value at `(step, downs)`, or `None` outside the triangle.
    #[inline]
    pub fn get(&self, step: usize, downs: usize) -> Option<T> {
        if step > self.steps || downs > step {
            return None;
        }
        self.nodes.get(idx(step, downs)).copied()
    }

    /// Overwrite the node at `(step, downs)`.
    ///
    /// # Panics
    /// Panics if the node lies outside the triangle.
    #[inline]
    pub fn set(&mut self, step: usize, downs: usize, value: T) {
        assert!(
            step <= self.steps && downs <= step,
            "node ({}, {}) outside a {}-step lattice",
            step,
            downs,
            self.steps
        );
        self.nodes[idx(step, downs)] = value;
    }

    /// All nodes of one time step, most up-moves first.
    ///
    /// # Panics
    /// Panics if `step > steps()`.
    pub fn layer(&self, step: usize) -> &[T] {
        assert!(step <= self.steps, "layer {} beyond {} steps", step, self.steps);
        &self.nodes[idx(step, 0)..idx(step + 1, 0)]
    }

    /// Iterate over layers from the root to the leaves.
    pub fn layers(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..=self.steps).map(move |step| self.layer(step))
    }

    /// Value at the root node `(0, 0)`.
    #[inline]
    pub fn root(&self) -> T {
        self.nodes[0]
    }
}
