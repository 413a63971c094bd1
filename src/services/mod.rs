pub mod classifier;
pub mod normalizer;
pub mod patterns;
pub mod tmdb;
pub mod transport;
pub mod xtream;
