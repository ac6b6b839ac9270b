pub mod coordinate;
pub mod geodesy;
pub mod grid;
