//! Debounced redraw on viewport resize.
//!
//! [`Debouncer`] is the timer state machine with time injected by the caller.
//! [`RedrawScheduler`] drives it from a channel of [`ViewportEvent`]s on the current thread, so
//! a burst of resizes yields exactly one trailing redraw.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Quiet period after the last resize before redrawing.
pub const REDRAW_DEBOUNCE: Duration = Duration::from_millis(120);

/// Single pending deadline; each `schedule` replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(REDRAW_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// (Re)arm the timer to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.pending = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the deadline, zero when overdue, `None` when idle.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|d| d.saturating_duration_since(now))
    }

    /// Consume the timer if it is due at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if now >= deadline => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

/// Viewport state delivered with each resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Container layout width in CSS pixels, if known.
    pub width: Option<f64>,
    pub device_pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: None,
            device_pixel_ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    Resized(Viewport),
}

/// Owns the debounce timer and the resize event source; calls `redraw` with the most recent
/// viewport once each burst has gone quiet.
pub struct RedrawScheduler<F>
where
    F: FnMut(Viewport),
{
    debouncer: Debouncer,
    events: Option<Receiver<ViewportEvent>>,
    latest: Viewport,
    redraw: F,
}

impl<F> RedrawScheduler<F>
where
    F: FnMut(Viewport),
{
    pub fn new(events: Receiver<ViewportEvent>, initial: Viewport, redraw: F) -> Self {
        Self::with_delay(events, initial, REDRAW_DEBOUNCE, redraw)
    }

    pub fn with_delay(
        events: Receiver<ViewportEvent>,
        initial: Viewport,
        delay: Duration,
        redraw: F,
    ) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            events: Some(events),
            latest: initial,
            redraw,
        }
    }

    /// Draw once immediately with the initial viewport (first paint is not debounced).
    pub fn redraw_now(&mut self) {
        (self.redraw)(self.latest);
    }

    /// Record a resize at `now` and re-arm the timer.
    pub fn schedule(&mut self, event: ViewportEvent, now: Instant) {
        match event {
            ViewportEvent::Resized(v) => self.latest = v,
        }
        self.debouncer.schedule(now);
    }

    /// Run the pending redraw if its deadline has passed. Returns whether it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.debouncer.fire_if_due(now) {
            log::debug!("redraw at width {:?}", self.latest.width);
            (self.redraw)(self.latest);
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn is_attached(&self) -> bool {
        self.events.is_some()
    }

    /// Process events until the source disconnects or the scheduler is disposed.
    ///
    /// A redraw still pending when the source disconnects is honoured before returning.
    pub fn run(&mut self) {
        loop {
            let Some(events) = self.events.as_ref() else {
                return;
            };
            let received = match self.debouncer.remaining(Instant::now()) {
                Some(wait) => events.recv_timeout(wait),
                None => events.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(event) => self.schedule(event, Instant::now()),
                Err(RecvTimeoutError::Timeout) => {
                    self.poll(Instant::now());
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.events = None;
                    if let Some(wait) = self.debouncer.remaining(Instant::now()) {
                        std::thread::sleep(wait);
                        self.poll(Instant::now());
                    }
                    return;
                }
            }
        }
    }

    /// Cancel any pending redraw and detach from the event source.
    pub fn dispose(&mut self) {
        self.debouncer.cancel();
        self.events = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_replaces_previous_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.schedule(t0);
        d.schedule(t0 + Duration::from_millis(50));
        assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(170)));
        assert!(!d.fire_if_due(t0 + Duration::from_millis(169)));
        assert!(d.fire_if_due(t0 + Duration::from_millis(170)));
        assert!(!d.is_pending());
    }

    #[test]
    fn remaining_saturates() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(10));
        assert_eq!(d.remaining(t0), None);
        d.schedule(t0);
        assert_eq!(d.remaining(t0 + Duration::from_millis(30)), Some(Duration::ZERO));
    }
}
