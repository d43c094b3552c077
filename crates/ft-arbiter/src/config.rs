//! Arbiter configuration.

/// Knobs for a [`TrafficArbiter`][crate::TrafficArbiter].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArbiterConfig {
    /// Buffer every emitted [`TrafficEvent`][crate::TrafficEvent] until
    /// [`drain_events`][crate::TrafficArbiter::drain_events] is called.
    ///
    /// Log lines are written regardless.  Turn this off when nothing drains
    /// the buffer, or it grows without bound.
    pub record_events: bool,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self { record_events: true }
    }
}
