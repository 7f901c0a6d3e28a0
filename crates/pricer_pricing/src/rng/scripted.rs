//! Replays a fixed sequence of normal draws.

use super::NormalGenerator;

/// Generator that cycles through a given list of draws.
///
/// Lets a test pin every shock of a simulation and check path values by
/// hand.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::{NormalGenerator, ScriptedNormals};
///
/// let mut g = ScriptedNormals::new(vec![1.0, -1.0]).unwrap();
/// assert_eq!(g.next_normal(), 1.0);
/// assert_eq!(g.next_normal(), -1.0);
/// assert_eq!(g.next_normal(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedNormals {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedNormals {
    /// Cycle over `draws`; `None` when the list is empty.
    pub fn new(draws: Vec<f64>) -> Option<Self> {
        if draws.is_empty() {
            return None;
        }
        Some(Self { draws, cursor: 0 })
    }

    /// Draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl NormalGenerator for ScriptedNormals {
    fn next_normal(&mut self) -> f64 {
        let z = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        assert!(ScriptedNormals::new(Vec::new()).is_none());
    }

    #[test]
    fn test_counts_consumption() {
        let mut g = ScriptedNormals::new(vec![0.5]).unwrap();
        let mut buf = [0.0; 3];
        g.fill_normal(&mut buf);
        assert_eq!(buf, [0.5; 3]);
        assert_eq!(g.consumed(), 3);
    }
}
