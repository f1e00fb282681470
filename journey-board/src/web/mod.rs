//! Web layer for the journey board.
//!
//! A JSON adapter standing in for the tile and dialog: it drives the board
//! (connect, disconnect, next route) and exposes the last rendered view.

mod dto;
mod routes;
mod state;
mod view;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use view::{BoardView, ViewPhase, ViewSink, view_channel};
