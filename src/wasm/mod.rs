pub mod d2;
pub mod d3;
pub mod utils;
