pub mod game;
pub mod sim;
pub mod types;
