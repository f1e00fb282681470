//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::watch;

use crate::board::JourneyBoard;
use crate::domain::RoutePairCatalog;

use super::view::BoardView;

/// Shared application state.
///
/// Contains everything the handlers need to reach the board.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the running board
    pub board: JourneyBoard,

    /// Last rendered view
    pub view: watch::Receiver<BoardView>,

    /// Route catalog
    pub catalog: Arc<RoutePairCatalog>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        board: JourneyBoard,
        view: watch::Receiver<BoardView>,
        catalog: Arc<RoutePairCatalog>,
    ) -> Self {
        Self {
            board,
            view,
            catalog,
        }
    }
}
