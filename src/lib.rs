//! Library crate for webverse-back, exposing the game core, the sync client and the server layers.

pub mod config;
pub mod dao;
mod dto;
mod error;
pub mod game;
pub mod routes;
pub mod services;
pub mod state;
pub mod sync;
