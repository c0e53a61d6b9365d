pub mod board;
pub mod game;
pub mod puzzle;
pub mod session;
pub mod status;
