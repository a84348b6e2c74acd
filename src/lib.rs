//! Pokebox - PokeAPI catalog browser
//!
//! The library holds the catalog core (wire types, mapping, evolution
//! flattening, caching, paging and the [`dex::Dex`] orchestrator) and the
//! tui-dispatch store the terminal UI drives.

pub mod action;
pub mod api;
pub mod cache;
pub mod dex;
pub mod effect;
pub mod evolution;
pub mod format;
pub mod gender;
pub mod mapper;
pub mod pager;
pub mod reducer;
pub mod state;
