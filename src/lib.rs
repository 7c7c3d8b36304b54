pub mod constants;
pub mod engine;
pub mod entity;
pub mod error;
pub mod input;
pub mod render;
pub mod rng;
pub mod types;
pub mod world;
