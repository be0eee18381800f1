pub mod region;
pub mod session;
pub mod wrap;
pub mod zone;
