//! Order lifecycle status and progress tracking.
//!
//! Orders move through a fixed progression of stages:
//!
//! ```text
//! pending -> waiting_for_payment -> processing -> shipped -> delivered
//! ```
//!
//! `cancelled` sits outside the progression. Staff may set any status at any
//! time (including moving backwards or skipping stages); progress is derived
//! purely from where the current status sits in the progression.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    WaitingForPayment,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The ordered progression used for progress display. `Cancelled` is not a stage.
    pub const STAGES: [Self; 5] = [
        Self::Pending,
        Self::WaitingForPayment,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
    ];

    /// Every value staff can pick from the status selector.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::WaitingForPayment,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire representation (`waiting_for_payment`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::WaitingForPayment => "waiting_for_payment",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human label with underscores replaced by spaces.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WaitingForPayment => "waiting for payment",
            other => other.as_str(),
        }
    }

    /// Position of this status in [`Self::STAGES`], or `None` for `Cancelled`.
    #[must_use]
    pub fn stage_index(self) -> Option<usize> {
        Self::STAGES.iter().position(|stage| *stage == self)
    }
}

/// Position of a raw status string in the progression.
///
/// Unknown strings (and `cancelled`) yield `None` rather than an error; the
/// progress display then shows every stage as not reached.
#[must_use]
pub fn stage_index_of(raw: &str) -> Option<usize> {
    raw.parse::<OrderStatus>()
        .ok()
        .and_then(OrderStatus::stage_index)
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// One stage of the progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageProgress {
    pub stage: OrderStatus,
    pub label: &'static str,
    /// Stages at or before the current one are reached.
    pub reached: bool,
}

/// Progress of an order through [`OrderStatus::STAGES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProgress {
    /// The stored status, verbatim.
    pub current: String,
    pub current_index: Option<usize>,
    pub stages: Vec<StageProgress>,
}

impl OrderProgress {
    /// Build the progress display for a status.
    #[must_use]
    pub fn for_status(current: OrderStatus) -> Self {
        Self::for_raw(current.as_str())
    }

    /// Build the progress display for a stored status string.
    ///
    /// A value outside the six known statuses reaches no stage.
    #[must_use]
    pub fn for_raw(current: &str) -> Self {
        let current_index = stage_index_of(current);
        let stages = OrderStatus::STAGES
            .iter()
            .enumerate()
            .map(|(index, stage)| StageProgress {
                stage: *stage,
                label: stage.label(),
                reached: current_index.is_some_and(|current| index <= current),
            })
            .collect();

        Self {
            current: current.to_owned(),
            current_index,
            stages,
        }
    }

    /// Number of stages reached.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.stages.iter().filter(|s| s.reached).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_index_of_shipped() {
        assert_eq!(stage_index_of("shipped"), Some(3));
        assert_eq!(OrderStatus::Shipped.stage_index(), Some(3));
    }

    #[test]
    fn test_cancelled_is_not_a_stage() {
        assert_eq!(stage_index_of("cancelled"), None);
        assert_eq!(OrderStatus::Cancelled.stage_index(), None);
    }

    #[test]
    fn test_unknown_status_is_not_an_error() {
        assert_eq!(stage_index_of("lost_in_transit"), None);
        assert_eq!(stage_index_of("Shipped"), None);
    }

    #[test]
    fn test_progress_marks_stages_up_to_current() {
        let progress = OrderProgress::for_status(OrderStatus::Processing);
        let reached: Vec<bool> = progress.stages.iter().map(|s| s.reached).collect();
        assert_eq!(reached, vec![true, true, true, false, false]);
        assert_eq!(progress.reached_count(), 3);
    }

    #[test]
    fn test_progress_for_cancelled_reaches_nothing() {
        let progress = OrderProgress::for_status(OrderStatus::Cancelled);
        assert_eq!(progress.current_index, None);
        assert_eq!(progress.reached_count(), 0);
        assert_eq!(progress.stages.len(), 5);
    }

    #[test]
    fn test_progress_for_unrecognized_status() {
        let progress = OrderProgress::for_raw("returned");
        assert_eq!(progress.current, "returned");
        assert_eq!(progress.current_index, None);
        assert_eq!(progress.reached_count(), 0);
        assert_eq!(progress.stages.len(), 5);
    }

    #[test]
    fn test_progress_for_raw_matches_known_status() {
        assert_eq!(
            OrderProgress::for_raw("shipped"),
            OrderProgress::for_status(OrderStatus::Shipped)
        );
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&OrderStatus::WaitingForPayment).ok();
        assert_eq!(json.as_deref(), Some("\"waiting_for_payment\""));
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(OrderStatus::WaitingForPayment.label(), "waiting for payment");
        assert_eq!(OrderStatus::Delivered.label(), "delivered");
    }
}
