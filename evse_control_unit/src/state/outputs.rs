//! Relay and indicator output image.
//!
//! The session writes levels into an [`OutputImage`]; the cycle runner
//! pushes only the channels that changed since the last applied image.

use evse_common::channel::{Indicator, Relay};

/// Maximum number of channel changes in one cycle.
pub const MAX_CHANGES: usize = Relay::COUNT + Indicator::COUNT;

/// One channel write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChange {
    Relay(Relay, bool),
    Indicator(Indicator, bool),
}

/// Commanded level of every relay and indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputImage {
    relays: [bool; Relay::COUNT],
    indicators: [bool; Indicator::COUNT],
}

impl OutputImage {
    #[inline]
    pub const fn relay(&self, relay: Relay) -> bool {
        self.relays[relay.index()]
    }

    #[inline]
    pub fn set_relay(&mut self, relay: Relay, closed: bool) {
        self.relays[relay.index()] = closed;
    }

    #[inline]
    pub const fn indicator(&self, indicator: Indicator) -> bool {
        self.indicators[indicator.index()]
    }

    #[inline]
    pub fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        self.indicators[indicator.index()] = on;
    }

    /// De-energize main, VP and lock.
    pub fn open_all_relays(&mut self) {
        self.relays = [false; Relay::COUNT];
    }

    /// Channels that differ from `applied`; every channel when nothing was applied yet.
    pub fn changes_since(
        &self,
        applied: Option<&OutputImage>,
    ) -> heapless::Vec<OutputChange, MAX_CHANGES> {
        let mut changes = heapless::Vec::new();
        for relay in Relay::ALL {
            let level = self.relay(relay);
            if applied.is_none_or(|prev| prev.relay(relay) != level) {
                // Capacity is exactly one slot per channel.
                let _ = changes.push(OutputChange::Relay(relay, level));
            }
        }
        for indicator in Indicator::ALL {
            let level = self.indicator(indicator);
            if applied.is_none_or(|prev| prev.indicator(indicator) != level) {
                let _ = changes.push(OutputChange::Indicator(indicator, level));
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_apply_writes_every_channel() {
        let image = OutputImage::default();
        assert_eq!(image.changes_since(None).len(), MAX_CHANGES);
    }

    #[test]
    fn only_changed_channels_are_reported() {
        let prev = OutputImage::default();
        let mut next = prev;
        next.set_relay(Relay::Lock, true);
        next.set_indicator(Indicator::Fault, true);

        let changes = next.changes_since(Some(&prev));
        assert_eq!(
            changes.as_slice(),
            &[
                OutputChange::Relay(Relay::Lock, true),
                OutputChange::Indicator(Indicator::Fault, true),
            ]
        );
        assert!(next.changes_since(Some(&next)).is_empty());
    }

    #[test]
    fn open_all_relays_leaves_indicators() {
        let mut image = OutputImage::default();
        for relay in Relay::ALL {
            image.set_relay(relay, true);
        }
        image.set_indicator(Indicator::Standby, true);
        image.open_all_relays();
        assert!(Relay::ALL.iter().all(|&r| !image.relay(r)));
        assert!(image.indicator(Indicator::Standby));
    }
}
