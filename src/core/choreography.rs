//! # Choreography
//!
//! Paces the bot's replies so the conversation reads like someone typing.
//!
//! Cues sit in a FIFO. Each cue's delay counts from the moment the cue ahead of
//! it fired; the head of a freshly filled queue counts from the first poll that
//! sees it. Only the head is ever considered, so cues fire strictly in the order
//! they were scheduled.
//!
//! ```text
//! schedule(500ms, A) ─┐
//! schedule(0ms,   B) ─┼─▶ [A, B, C] ──poll(t0)──▶ arm clock at t0
//! schedule(1s,    C) ─┘                poll(t0+500ms) ─▶ A, B
//!                                      poll(t0+1.5s)  ─▶ C
//! ```
//!
//! Nothing is cancellable. Pacing is cosmetic, never needed for correctness.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Delays between scripted bot actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Before the opening menu.
    pub greeting: Duration,
    /// Before a bot reply to the user's last input.
    pub reply: Duration,
    /// Before the main menu is re-offered after a finished exchange.
    pub menu: Duration,
}

impl Timing {
    /// All delays zero. Cues still go through the queue, they just fire on the next poll.
    pub const INSTANT: Timing = Timing {
        greeting: Duration::ZERO,
        reply: Duration::ZERO,
        menu: Duration::ZERO,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            greeting: Duration::from_millis(1000),
            reply: Duration::from_millis(500),
            menu: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug)]
struct Cue<S> {
    delay: Duration,
    step: S,
}

#[derive(Debug)]
pub struct Choreography<S> {
    queue: VecDeque<Cue<S>>,
    /// When the head cue's delay started counting. `None` until first polled.
    anchor: Option<Instant>,
}

impl<S> Default for Choreography<S> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            anchor: None,
        }
    }
}

impl<S> Choreography<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: Duration, step: S) {
        self.queue.push_back(Cue { delay, step });
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pop the head cue if its delay has elapsed at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<S> {
        let delay = self.queue.front()?.delay;
        let anchor = *self.anchor.get_or_insert(now);
        let fire_at = anchor + delay;
        if now < fire_at {
            return None;
        }
        let cue = self.queue.pop_front()?;
        // Next cue counts from when this one was due, so a late poll doesn't stretch the script.
        self.anchor = if self.queue.is_empty() {
            None
        } else {
            Some(fire_at)
        };
        Some(cue.step)
    }

    /// Pop the head cue regardless of time.
    pub fn pop_now(&mut self) -> Option<S> {
        let cue = self.queue.pop_front()?;
        self.anchor = None;
        Some(cue.step)
    }

    /// Time left until the head cue is due. `None` when the queue is empty.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        let delay = self.queue.front()?.delay;
        match self.anchor {
            Some(anchor) => Some((anchor + delay).saturating_duration_since(now)),
            None => Some(delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_empty_queue_yields_nothing() {
        let mut c: Choreography<u8> = Choreography::new();
        assert_eq!(c.pop_due(Instant::now()), None);
        assert_eq!(c.time_until_due(Instant::now()), None);
    }

    #[test]
    fn test_clock_arms_on_first_poll() {
        let mut c = Choreography::new();
        c.schedule(500 * MS, 'a');
        let t0 = Instant::now();
        assert_eq!(c.pop_due(t0), None);
        assert_eq!(c.pop_due(t0 + 499 * MS), None);
        assert_eq!(c.pop_due(t0 + 500 * MS), Some('a'));
        assert!(c.is_empty());
    }

    #[test]
    fn test_delays_chain_from_previous_cue() {
        let mut c = Choreography::new();
        c.schedule(500 * MS, 'a');
        c.schedule(Duration::ZERO, 'b');
        c.schedule(1000 * MS, 'c');
        let t0 = Instant::now();
        c.pop_due(t0);
        assert_eq!(c.pop_due(t0 + 500 * MS), Some('a'));
        assert_eq!(c.pop_due(t0 + 500 * MS), Some('b'));
        assert_eq!(c.pop_due(t0 + 1499 * MS), None);
        assert_eq!(c.time_until_due(t0 + 1000 * MS), Some(500 * MS));
        assert_eq!(c.pop_due(t0 + 1500 * MS), Some('c'));
    }

    #[test]
    fn test_late_poll_fires_backlog_in_order() {
        let mut c = Choreography::new();
        c.schedule(100 * MS, 1);
        c.schedule(100 * MS, 2);
        c.schedule(100 * MS, 3);
        let t0 = Instant::now();
        c.pop_due(t0);
        let late = t0 + 10_000 * MS;
        let fired: Vec<_> = std::iter::from_fn(|| c.pop_due(late)).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_pop_now_ignores_delay() {
        let mut c = Choreography::new();
        c.schedule(Duration::from_secs(60), 'x');
        assert_eq!(c.pop_now(), Some('x'));
        assert_eq!(c.pop_now(), None);
    }
}
