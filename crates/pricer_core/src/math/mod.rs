//! Numerical building blocks.
//!
//! - [`solvers`]: Brent, Newton-Raphson and Levenberg-Marquardt
//! - [`statistics`]: Sample statistics over price series

pub mod solvers;
pub mod statistics;
