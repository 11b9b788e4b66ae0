/// Cancel-and-reschedule debouncing
///
/// A `Debouncer` coalesces bursts of values into a single delivery: every
/// `trigger` cancels the pending delivery and schedules a new one `delay`
/// later, so the sink only ever sees the last value of a burst.
///
/// The debouncer is split into a cheap cloneable handle and a driver future.
/// The caller decides which runtime the driver runs on (the Tauri async
/// runtime in the app, the test runtime in tests).

use std::future::Future;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, trace};

/// Quiet period before window bounds are written to the config store
pub const BOUNDS_DEBOUNCE: Duration = Duration::from_millis(250);

/// Handle used to feed values into a debouncer driver
#[derive(Debug)]
pub struct Debouncer<T> {
    sender: mpsc::UnboundedSender<T>,
}

// Manual impl: deriving would require `T: Clone`
impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer handle and the driver future that delivers to `sink`.
    ///
    /// The driver ends once every handle has been dropped; a value still
    /// pending at that point is delivered immediately.
    pub fn new<F>(delay: Duration, sink: F) -> (Self, impl Future<Output = ()> + Send + 'static)
    where
        F: FnMut(T) + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, drive(receiver, delay, sink))
    }

    /// Replace any pending value and restart the quiet period.
    ///
    /// Returns `false` when the driver is no longer running.
    pub fn trigger(&self, value: T) -> bool {
        self.sender.send(value).is_ok()
    }
}

async fn drive<T, F>(mut receiver: mpsc::UnboundedReceiver<T>, delay: Duration, mut sink: F)
where
    F: FnMut(T),
{
    let timer = sleep(delay);
    tokio::pin!(timer);

    let mut pending: Option<T> = None;

    loop {
        tokio::select! {
            next = receiver.recv() => match next {
                Some(value) => {
                    if pending.replace(value).is_some() {
                        trace!("Debounce: cancelled pending delivery");
                    }
                    timer.as_mut().reset(Instant::now() + delay);
                }
                None => break,
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    sink(value);
                }
            }
        }
    }

    if let Some(value) = pending.take() {
        debug!("Debouncer closing, flushing pending value");
        sink(value);
    }
}
