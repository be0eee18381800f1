pub mod debug;
pub mod rng;
pub mod snapshot;
