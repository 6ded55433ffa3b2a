pub mod cluster;
pub mod filter;
pub mod marker;
