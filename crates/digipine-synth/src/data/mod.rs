pub mod bias;
pub mod ranges;
pub mod rng;
pub mod snapshot;
pub mod synth;
