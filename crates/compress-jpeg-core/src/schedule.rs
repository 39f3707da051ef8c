//! Suspension hooks for synchronous drivers.
//!
//! A [`CompressionRun`](crate::pipeline::CompressionRun) stops at each
//! suspension point and hands control back to whoever called `resume`. Async
//! hosts (the wasm bindings) await their event loop there; synchronous hosts
//! pass a [`Scheduler`] to [`run_to_completion`](crate::pipeline::run_to_completion).

/// Called once at every suspension point of a synchronously driven run.
pub trait Scheduler {
    fn suspend(&mut self);
}

/// Continues immediately. The whole run executes on the caller's stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Scheduler for Immediate {
    fn suspend(&mut self) {}
}

/// Yields the current OS thread's time slice at every suspension point.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadYield;

impl Scheduler for ThreadYield {
    fn suspend(&mut self) {
        std::thread::yield_now();
    }
}

/// Counts suspensions without otherwise delaying the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingScheduler {
    pub suspensions: usize,
}

impl Scheduler for CountingScheduler {
    fn suspend(&mut self) {
        self.suspensions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_scheduler() {
        let mut scheduler = CountingScheduler::default();
        scheduler.suspend();
        scheduler.suspend();
        assert_eq!(scheduler.suspensions, 2);
    }

    #[test]
    fn test_thread_yield_returns() {
        let mut scheduler = ThreadYield;
        scheduler.suspend();
    }
}
