//! Timers and task spawning for a single-threaded event loop.

use futures::future::LocalBoxFuture;

/// Event loop services the content script needs.
pub trait Runtime {
    /// Resolve after `ms` milliseconds without blocking the loop.
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;

    /// Run `task` to completion in the background.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
