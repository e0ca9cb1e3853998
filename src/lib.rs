// Library exports for the light-cycle arena
// The runner binary and the demo agent both build on these modules

pub mod arena;
pub mod board;
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod player;
pub mod source;
pub mod strategy;
pub mod types;
pub mod view;
