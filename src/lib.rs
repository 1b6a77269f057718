//! terreplus - register terrains, draw their boundaries and request ML
//! price estimates from the TerrePlus backend

pub mod api;
pub mod auth;
pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod geometry;
