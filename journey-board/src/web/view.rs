//! What the HTTP adapter shows: the last rendered board state.

use chrono::{DateTime, Local};
use tokio::sync::watch;

use crate::domain::{Journey, RoutePair};
use crate::navitia::FetchError;
use crate::selection::RenderSink;
use crate::worker::JourneyQueryResult;

/// Display phase of the journey list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPhase {
    /// Nothing requested yet
    Idle,
    /// A fetch for the shown route is in flight
    Loading,
    /// Journeys for the shown route
    Ready(Vec<Journey>),
    /// The lookup for the shown route failed
    Failed(FetchError),
}

/// The rendered board.
///
/// Each render replaces the whole view; nothing is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Route the view belongs to
    pub route: Option<RoutePair>,
    /// Phase of the journey list
    pub phase: ViewPhase,
    /// When the view last changed
    pub updated_at: Option<DateTime<Local>>,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            route: None,
            phase: ViewPhase::Idle,
            updated_at: None,
        }
    }
}

/// Render sink publishing into a watch channel.
#[derive(Debug)]
pub struct ViewSink {
    tx: watch::Sender<BoardView>,
}

/// Create a sink and the receiver the HTTP adapter reads from.
pub fn view_channel() -> (ViewSink, watch::Receiver<BoardView>) {
    let (tx, rx) = watch::channel(BoardView::default());
    (ViewSink { tx }, rx)
}

impl ViewSink {
    fn publish(&self, route: &RoutePair, phase: ViewPhase) {
        self.tx.send_replace(BoardView {
            route: Some(route.clone()),
            phase,
            updated_at: Some(Local::now()),
        });
    }
}

impl RenderSink for ViewSink {
    fn on_pending(&mut self, pair: &RoutePair) {
        self.publish(pair, ViewPhase::Loading);
    }

    fn on_result(&mut self, pair: &RoutePair, result: JourneyQueryResult) {
        let phase = match result {
            Ok(journeys) => ViewPhase::Ready(journeys),
            Err(e) => ViewPhase::Failed(e),
        };
        self.publish(pair, phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pair() -> RoutePair {
        RoutePair::new("admin:fr:35188", "Montfort", "admin:fr:35238", "Rennes")
    }

    fn journey() -> Journey {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        Journey::new(
            day.and_hms_opt(8, 0, 0).unwrap(),
            day.and_hms_opt(8, 20, 0).unwrap(),
        )
    }

    #[test]
    fn starts_idle() {
        let (_sink, rx) = view_channel();
        assert_eq!(*rx.borrow(), BoardView::default());
    }

    #[test]
    fn pending_then_result_replaces() {
        let (mut sink, rx) = view_channel();

        sink.on_pending(&pair());
        assert_eq!(rx.borrow().phase, ViewPhase::Loading);
        assert_eq!(rx.borrow().route, Some(pair()));

        sink.on_result(&pair(), Ok(vec![journey(), journey()]));
        assert_eq!(rx.borrow().phase, ViewPhase::Ready(vec![journey(), journey()]));

        sink.on_result(&pair(), Ok(Vec::new()));
        assert_eq!(rx.borrow().phase, ViewPhase::Ready(Vec::new()));
        assert!(rx.borrow().updated_at.is_some());
    }

    #[test]
    fn failure_is_shown() {
        let (mut sink, rx) = view_channel();
        let err = FetchError::Transport("connection refused".to_string());

        sink.on_result(&pair(), Err(err.clone()));
        assert_eq!(rx.borrow().phase, ViewPhase::Failed(err));
    }
}
