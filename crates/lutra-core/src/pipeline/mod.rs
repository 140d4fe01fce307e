//! Color transform pipeline: stage math, the ordered chain, and noise.

pub mod chain;
pub mod noise;
pub mod stages;

pub use chain::{Look, Stage, TransformChain};
