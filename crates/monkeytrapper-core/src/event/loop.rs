// Monkeytrapper Event Loop
// Read from the source, apply the scroll rule, write to the sink

use std::io;

use crate::error::{SessionError, SessionResult};
use crate::input::RawEvent;
use crate::output::EventSink;
use crate::transform::{ScrollResult, ScrollRule};

/// What a single wait on the source produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    /// Events read in one go, in source order
    Events(Vec<RawEvent>),
    /// A shutdown signal arrived while waiting
    Shutdown,
    /// The source has nothing more to give
    Closed,
}

/// Blocking source of input events
pub trait EventSource {
    /// Wait for the next events. Blocks without a timeout.
    fn fetch(&mut self) -> io::Result<Fetched>;
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn fetch(&mut self) -> io::Result<Fetched> {
        (**self).fetch()
    }
}

/// Why the loop ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// SIGINT or SIGTERM
    Shutdown,
    /// The source closed
    SourceClosed,
}

/// Counters kept over the life of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub read: u64,
    pub forwarded: u64,
    pub remapped: u64,
    pub suppressed: u64,
}

/// The capture/transform/re-emit loop.
///
/// Single-threaded: every event is fully written before the next one is
/// looked at, so output order follows input order exactly.
pub struct EventLoop<S, O> {
    source: S,
    sink: O,
    rule: ScrollRule,
    stats: LoopStats,
}

impl<S: EventSource, O: EventSink> EventLoop<S, O> {
    pub fn new(source: S, sink: O, rule: ScrollRule) -> Self {
        Self {
            source,
            sink,
            rule,
            stats: LoopStats::default(),
        }
    }

    /// Run until shutdown, the source closing, or a read/write failure.
    pub fn run(&mut self) -> SessionResult<Termination> {
        log::info!(
            "Forwarding events ({} mode, step {})",
            self.rule.mode(),
            self.rule.step()
        );

        loop {
            let events = match self.source.fetch().map_err(SessionError::ReadFailed)? {
                Fetched::Events(events) => events,
                Fetched::Shutdown => {
                    log::info!("Received signal, shutting down gracefully");
                    return Ok(Termination::Shutdown);
                }
                Fetched::Closed => return Ok(Termination::SourceClosed),
            };

            for event in events {
                self.process(event)?;
            }
        }
    }

    /// Apply the rule to one event and write the result.
    ///
    /// A failed write is fatal: a remapped pair written without its
    /// partner would leave consumers with half an update.
    pub fn process(&mut self, event: RawEvent) -> SessionResult<()> {
        self.stats.read += 1;

        let result = self.rule.apply(event);
        match result {
            ScrollResult::Passthrough(_) => self.stats.forwarded += 1,
            ScrollResult::Remapped([wheel, hi_res]) => {
                log::debug!("Remapped {} -> {}, {}", event, wheel, hi_res);
                self.stats.remapped += 1;
            }
            ScrollResult::Suppress => {
                log::trace!("Suppressed {}", event);
                self.stats.suppressed += 1;
            }
        }

        for output in result.output() {
            self.sink.write(output).map_err(SessionError::WriteFailed)?;
        }
        Ok(())
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// Consume the loop, handing back the sink
    pub fn into_sink(self) -> O {
        self.sink
    }
}
