//! Coalescing of expensive recomputes behind a debounce delay.
use std::time::Duration;
///monotonic time since an arbitrary origin
#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub fn now() -> Duration {
    use std::sync::OnceLock;
    use std::time::Instant;
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed()
}
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn now() -> Duration {
    Duration::from_secs_f64(js_sys::Date::now() / 1000.0)
}
///at most one pending request, a newer request supersedes the older one and
///restarts the delay, so a burst of requests runs once after it settles
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Debounce {
    delay: Duration,
    ///time of the latest unserved request
    pending: Option<Duration>,
}
impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }
    pub fn request(&mut self, at: Duration) {
        self.pending = Some(at);
    }
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
    ///true once, when the delay has passed since the latest request
    pub fn poll(&mut self, at: Duration) -> bool {
        match self.pending {
            Some(requested) if at.saturating_sub(requested) >= self.delay => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
    ///serve the pending request now regardless of the delay
    pub fn take(&mut self) -> bool {
        self.pending.take().is_some()
    }
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
