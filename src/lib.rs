//! Fixed-timestep Snake simulation.
//!
//! The core is [`game::Simulation`], driven one tick at a time by
//! [`session::Game`], which pairs it with the per-tick input debounce in
//! [`input::InputController`] and the accumulator in
//! [`scheduler::Scheduler`]. Rendering, audio and persistence are external
//! collaborators that only read [`game::Snapshot`] values or implement the
//! small traits in [`audio`] and [`score`].

pub mod audio;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod score;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
