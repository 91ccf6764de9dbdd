//! Error reporting sink
//!
//! Every failed driver operation is published to the driver's
//! [`ErrorReporter`] before the error is returned to the caller. Publishing is fire-and-forget: reporters must not
//! block and cannot fail.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::pubsub::{ImmediatePublisher, PubSubChannel, Publisher};
use embedded_hal::i2c::ErrorKind;
use log::error;

/// Number of error events buffered in an [`ErrorChannel`].
/// Oldest events are dropped when a subscriber falls behind.
pub const ERROR_CHANNEL_CAPACITY: usize = 4;

/// Number of subscribers that can listen to error events
pub const ERROR_SUBSCRIBERS: usize = 2;

/// Number of publishers (one per driver)
pub const ERROR_PUBLISHERS: usize = 1;

/// Pub-sub channel carrying [`ErrorEvent`]s, suitable for a `static`.
pub type ErrorChannel = PubSubChannel<
    CriticalSectionRawMutex,
    ErrorEvent,
    ERROR_CHANNEL_CAPACITY,
    ERROR_SUBSCRIBERS,
    ERROR_PUBLISHERS,
>;

/// Operation that was running when the failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CalibrationLoad,
    TemperatureAcquisition,
    PressureAcquisition,
    ChipId,
    SoftReset,
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Bus transfer failed.
    Bus(ErrorKind),
    /// Acquisition attempted before the calibration block was loaded.
    NotCalibrated,
    /// Acquisition attempted on a halted driver.
    Halted,
}

/// A failure published by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorEvent {
    pub stage: Stage,
    pub kind: EventKind,
}

/// One-way sink for driver failures.
pub trait ErrorReporter {
    fn publish(&mut self, event: ErrorEvent);
}

/// Discards every event.
impl ErrorReporter for () {
    fn publish(&mut self, _event: ErrorEvent) {}
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for &mut R {
    fn publish(&mut self, event: ErrorEvent) {
        (**self).publish(event);
    }
}

/// Writes every event to the log at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn publish(&mut self, event: ErrorEvent) {
        error!("BMP180 {:?} failed: {:?}", event.stage, event.kind);
    }
}

impl<M, const CAP: usize, const SUBS: usize, const PUBS: usize> ErrorReporter
    for Publisher<'_, M, ErrorEvent, CAP, SUBS, PUBS>
where
    M: RawMutex,
{
    fn publish(&mut self, event: ErrorEvent) {
        self.publish_immediate(event);
    }
}

impl<M, const CAP: usize, const SUBS: usize, const PUBS: usize> ErrorReporter
    for ImmediatePublisher<'_, M, ErrorEvent, CAP, SUBS, PUBS>
where
    M: RawMutex,
{
    fn publish(&mut self, event: ErrorEvent) {
        self.publish_immediate(event);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    /// Keeps every event for later inspection.
    #[derive(Default)]
    pub(crate) struct CollectingReporter {
        pub(crate) events: Vec<ErrorEvent>,
    }

    impl ErrorReporter for CollectingReporter {
        fn publish(&mut self, event: ErrorEvent) {
            self.events.push(event);
        }
    }

    #[test]
    fn test_channel_publisher_delivers_events() {
        let channel = ErrorChannel::new();
        let mut subscriber = channel.subscriber().unwrap();
        let mut publisher = channel.publisher().unwrap();

        let event = ErrorEvent {
            stage: Stage::PressureAcquisition,
            kind: EventKind::Bus(ErrorKind::Bus),
        };
        ErrorReporter::publish(&mut publisher, event);

        assert_eq!(subscriber.try_next_message_pure(), Some(event));
        assert_eq!(subscriber.try_next_message_pure(), None);
    }

    #[test]
    fn test_publishing_never_blocks_when_full() {
        let channel = ErrorChannel::new();
        let mut subscriber = channel.subscriber().unwrap();
        let mut publisher = channel.immediate_publisher();

        for _ in 0..ERROR_CHANNEL_CAPACITY + 3 {
            ErrorReporter::publish(
                &mut publisher,
                ErrorEvent {
                    stage: Stage::CalibrationLoad,
                    kind: EventKind::Bus(ErrorKind::Other),
                },
            );
        }

        let mut received = 0;
        while subscriber.try_next_message_pure().is_some() {
            received += 1;
        }
        assert_eq!(received, ERROR_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn report<R: ErrorReporter>(mut reporter: R) {
            reporter.publish(ErrorEvent {
                stage: Stage::ChipId,
                kind: EventKind::Halted,
            });
        }

        let mut collector = CollectingReporter::default();
        report(&mut collector);
        assert_eq!(collector.events.len(), 1);
    }
}
