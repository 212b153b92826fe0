//! GreenHero TUI - Terminal dashboard for the GreenHero tracker
//!
//! A thin display client over the embedded Hub from `greenhero-core`.
//!
//! # Architecture
//!
//! - **HubClient**: sends SurfaceEvents, drains HubMessages
//! - **DisplayState**: everything the renderer needs, built from HubMessages
//! - **Input**: pure key to [`input::Intent`] mapping
//! - **UI**: stateless ratatui rendering of one frame

pub mod app;
pub mod display;
pub mod hub_client;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::App;
