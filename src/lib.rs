pub mod config;
pub mod game;
pub mod gestures;
pub mod intent;
pub mod robot;
pub mod services;
pub mod speech;

// Re-export specific items if needed for convenient access
pub use game::controller::GameController;
