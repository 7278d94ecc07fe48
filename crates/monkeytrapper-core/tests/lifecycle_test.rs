// Monkeytrapper Session Lifecycle Tests
//
// Grab/release bookkeeping around a whole event loop run, for each way
// a session can end. The device is a mock that records grab calls.
//
// Run with: cargo test --test lifecycle_test

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use monkeytrapper_core::{
    run_grabbed, EventLoop, EventSource, Exclusive, Fetched, RawEvent, RecordingSink,
    ScrollMode, ScrollRule, SessionError, Termination, EXIT_FAILURE, EXIT_OK,
};

/// Calls the session made on the device, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Grab,
    Fetch,
    Ungrab,
}

type CallLog = Rc<RefCell<Vec<Call>>>;

struct MockDevice {
    calls: CallLog,
    script: VecDeque<io::Result<Fetched>>,
    refuse_grab: bool,
}

impl MockDevice {
    fn new(script: Vec<io::Result<Fetched>>) -> (Self, CallLog) {
        let calls = CallLog::default();
        let device = Self {
            calls: calls.clone(),
            script: script.into(),
            refuse_grab: false,
        };
        (device, calls)
    }

    fn busy() -> (Self, CallLog) {
        let (mut device, calls) = Self::new(vec![]);
        device.refuse_grab = true;
        (device, calls)
    }
}

impl Exclusive for MockDevice {
    fn grab(&mut self) -> io::Result<()> {
        self.calls.borrow_mut().push(Call::Grab);
        if self.refuse_grab {
            return Err(io::Error::from_raw_os_error(16)); // EBUSY
        }
        Ok(())
    }

    fn ungrab(&mut self) -> io::Result<()> {
        self.calls.borrow_mut().push(Call::Ungrab);
        Ok(())
    }
}

impl EventSource for MockDevice {
    fn fetch(&mut self) -> io::Result<Fetched> {
        self.calls.borrow_mut().push(Call::Fetch);
        self.script.pop_front().unwrap_or(Ok(Fetched::Closed))
    }
}

fn rule() -> ScrollRule {
    ScrollRule::new(ScrollMode::Fixed, 3)
}

/// Run a complete session and return its outcome plus the output stream
fn session(device: MockDevice) -> (Result<Termination, SessionError>, Vec<RawEvent>) {
    let mut output = Vec::new();
    let result = run_grabbed(device, |device| {
        let mut event_loop = EventLoop::new(device, RecordingSink::new(), rule());
        let result = event_loop.run();
        output = event_loop.into_sink().into_events();
        result
    });
    (result, output)
}

fn exit_code(result: &Result<Termination, SessionError>) -> u8 {
    match result {
        Ok(_) => EXIT_OK,
        Err(e) => e.exit_code(),
    }
}

fn ungrab_count(calls: &CallLog) -> usize {
    calls.borrow().iter().filter(|c| **c == Call::Ungrab).count()
}

#[test]
fn test_interrupt_while_waiting_releases_once() {
    let (device, calls) = MockDevice::new(vec![
        Ok(Fetched::Events(vec![RawEvent::wheel(4), RawEvent::sync()])),
        Ok(Fetched::Shutdown),
    ]);

    let (result, output) = session(device);

    assert!(matches!(result, Ok(Termination::Shutdown)));
    assert_eq!(exit_code(&result), EXIT_OK);
    assert_eq!(
        output,
        vec![
            RawEvent::wheel(3),
            RawEvent::wheel_hi_res(360),
            RawEvent::sync(),
            RawEvent::sync(),
        ]
    );
    assert_eq!(
        *calls.borrow(),
        vec![Call::Grab, Call::Fetch, Call::Fetch, Call::Ungrab]
    );
}

#[test]
fn test_closed_source_releases_once() {
    let (device, calls) = MockDevice::new(vec![]);
    let (result, _) = session(device);

    assert!(matches!(result, Ok(Termination::SourceClosed)));
    assert_eq!(ungrab_count(&calls), 1);
}

#[test]
fn test_read_failure_releases_once() {
    let (device, calls) = MockDevice::new(vec![
        Ok(Fetched::Events(vec![RawEvent::rel(0x00, 1)])),
        Err(io::Error::from_raw_os_error(19)), // ENODEV: unplugged
    ]);

    let (result, output) = session(device);

    assert!(matches!(result, Err(SessionError::ReadFailed(_))));
    assert_eq!(exit_code(&result), EXIT_FAILURE);
    assert_eq!(output, vec![RawEvent::rel(0x00, 1)]);
    assert_eq!(calls.borrow().last(), Some(&Call::Ungrab));
    assert_eq!(ungrab_count(&calls), 1);
}

#[test]
fn test_grab_failure_never_releases() {
    let (device, calls) = MockDevice::busy();
    let (result, output) = session(device);

    assert!(matches!(result, Err(SessionError::GrabFailed(_))));
    assert_eq!(exit_code(&result), EXIT_FAILURE);
    assert!(output.is_empty());
    assert_eq!(*calls.borrow(), vec![Call::Grab]);
}

#[test]
fn test_panic_in_loop_releases_once() {
    let (device, calls) = MockDevice::new(vec![]);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run_grabbed(device, |_| -> Result<(), SessionError> { panic!("loop crashed") })
    }));

    assert!(outcome.is_err());
    assert_eq!(*calls.borrow(), vec![Call::Grab, Call::Ungrab]);
}

#[cfg(feature = "evdev-backend")]
mod signals {
    use super::*;
    use std::os::unix::io::AsRawFd;
    use std::os::unix::net::UnixStream;

    use monkeytrapper_core::event::{wait_readable, Readiness};
    use monkeytrapper_core::ShutdownSignal;

    /// Device that never produces anything; only a signal can end the wait
    struct IdleDevice {
        events: UnixStream,
        _peer: UnixStream,
        shutdown: ShutdownSignal,
        calls: CallLog,
    }

    impl Exclusive for IdleDevice {
        fn grab(&mut self) -> io::Result<()> {
            self.calls.borrow_mut().push(Call::Grab);
            Ok(())
        }

        fn ungrab(&mut self) -> io::Result<()> {
            self.calls.borrow_mut().push(Call::Ungrab);
            Ok(())
        }
    }

    impl EventSource for IdleDevice {
        fn fetch(&mut self) -> io::Result<Fetched> {
            self.calls.borrow_mut().push(Call::Fetch);
            match wait_readable(self.events.as_raw_fd(), self.shutdown.as_raw_fd())? {
                Readiness::Shutdown => {
                    self.shutdown.triggered();
                    Ok(Fetched::Shutdown)
                }
                Readiness::Device => Ok(Fetched::Closed),
            }
        }
    }

    #[test]
    fn test_signal_during_blocking_wait_exits_cleanly() {
        let shutdown = ShutdownSignal::install().unwrap();
        let (events, peer) = UnixStream::pair().unwrap();
        let calls = CallLog::default();
        let device = IdleDevice {
            events,
            _peer: peer,
            shutdown,
            calls: calls.clone(),
        };

        let raiser = std::thread::spawn(|| {
            std::thread::sleep(std::time::Duration::from_millis(50));
            signal_hook::low_level::raise(signal_hook::consts::SIGINT).unwrap();
        });

        let result = run_grabbed(device, |device| {
            EventLoop::new(device, RecordingSink::new(), rule()).run()
        });
        raiser.join().unwrap();

        assert!(matches!(result, Ok(Termination::Shutdown)));
        assert_eq!(exit_code(&result), EXIT_OK);
        assert_eq!(*calls.borrow(), vec![Call::Grab, Call::Fetch, Call::Ungrab]);
    }
}
