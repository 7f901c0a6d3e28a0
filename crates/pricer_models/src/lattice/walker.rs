//! Backward induction shared by every lattice instrument.

use super::TriangularLattice;

/// Early-exercise value at `(step, downs)`.
pub type ExerciseFn<'a> = &'a dyn Fn(usize, usize) -> f64;

/// Fill a value lattice by backward induction.
///
/// * `terminal(downs)` gives the value on the last layer.
/// * `continuation(step, downs, up, down)` gives the held value at a node
///   from its two children.
/// * `exercise(step, downs)`, when supplied, is compared with the held value
///   at every interior node during the same pass and the larger is kept.
///
/// The whole lattice is returned; its root is the price.
///
/// # Examples
/// ```
/// use pricer_models::lattice::walk_back;
///
/// // Two-step tree paying the number of up-moves, discounted by 1%
/// let tree = walk_back(
///     2,
///     |downs| (2 - downs) as f64,
///     |_, _, up, down| 0.5 * (up + down) / 1.01,
///     None,
/// );
/// assert!((tree.root() - 1.0 / 1.01_f64.powi(2)).abs() < 1e-12);
/// ```
pub fn walk_back<F, C>(
    steps: usize,
    terminal: F,
    continuation: C,
    exercise: Option<ExerciseFn<'_>>,
) -> TriangularLattice<f64>
where
    F: Fn(usize) -> f64,
    C: Fn(usize, usize, f64, f64) -> f64,
{
    let mut values = TriangularLattice::new(steps, 0.0);
    for downs in 0..=steps {
        values.set(steps, downs, terminal(downs));
    }

    for step in (0..steps).rev() {
        for downs in 0..=step {
            let up = values.layer(step + 1)[downs];
            let down = values.layer(step + 1)[downs + 1];
            let held = continuation(step, downs, up, down);
            let value = match exercise {
                Some(exercise) => held.max(exercise(step, downs)),
                None => held,
            };
            values.set(step, downs, value);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_steps_is_terminal() {
        let tree = walk_back(0, |_| 7.0, |_, _, u, d| u + d, None);
        assert_eq!(tree.root(), 7.0);
    }

    #[test]
    fn test_exercise_floor_applies_at_every_node() {
        let floor = |_: usize, _: usize| 3.0;
        let tree = walk_back(3, |_| 0.0, |_, _, u, d| 0.5 * (u + d), Some(&floor));
        for step in 0..3 {
            assert!(tree.layer(step).iter().all(|&v| v == 3.0));
        }
        assert!(tree.layer(3).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_continuation_sees_children() {
        // Root = up-child - down-child of a 1-step tree
        let tree = walk_back(1, |downs| [10.0, 4.0][downs], |_, _, u, d| u - d, None);
        assert_eq!(tree.root(), 6.0);
    }
}
