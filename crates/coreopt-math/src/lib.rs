//! Numerical primitives for CoreOpt.

pub mod fit;
pub mod interp;
pub mod optimize;
pub mod sampling;
