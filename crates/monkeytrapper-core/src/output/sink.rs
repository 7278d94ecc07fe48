// Monkeytrapper Output Layer - Event Sink
// Destination for forwarded and rewritten events

use std::io;

use crate::input::RawEvent;

/// Something events can be written to, batch by batch.
///
/// Consumers only see a batch once it is terminated by a sync marker.
/// Writing a `SYN_REPORT` event and calling [`EventSink::sync`] are
/// equivalent.
pub trait EventSink {
    /// Write a single event
    fn write(&mut self, event: RawEvent) -> io::Result<()>;

    /// Terminate the current batch with a sync marker
    fn sync(&mut self) -> io::Result<()>;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn write(&mut self, event: RawEvent) -> io::Result<()> {
        (**self).write(event)
    }

    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }
}

/// In-memory sink recording the output stream, sync markers included
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSink {
    events: Vec<RawEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, in order
    pub fn events(&self) -> &[RawEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<RawEvent> {
        self.events
    }
}

impl EventSink for RecordingSink {
    fn write(&mut self, event: RawEvent) -> io::Result<()> {
        self.events.push(event);
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.events.push(RawEvent::sync());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.write(RawEvent::wheel(3)).unwrap();
        sink.write(RawEvent::wheel_hi_res(360)).unwrap();
        sink.sync().unwrap();

        assert_eq!(
            sink.events(),
            &[RawEvent::wheel(3), RawEvent::wheel_hi_res(360), RawEvent::sync()]
        );
    }

    #[test]
    fn test_sync_and_written_syn_report_are_equivalent() {
        let mut synced = RecordingSink::new();
        synced.sync().unwrap();

        let mut written = RecordingSink::new();
        written.write(RawEvent::sync()).unwrap();

        assert_eq!(synced, written);
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut sink = RecordingSink::new();
        {
            let mut by_ref = &mut sink;
            by_ref.write(RawEvent::wheel(1)).unwrap();
            EventSink::sync(&mut by_ref).unwrap();
        }
        assert_eq!(sink.into_events().len(), 2);
    }
}
