//! Render-request signalling.
//!
//! The engines never talk to a UI framework directly. They hold a
//! [`RenderSignal`] and call [`RenderSignal::request_render`] when the model
//! changed; the host decides what a render is.
//!
//! [`RenderGeneration`] is the stock implementation: an opaque counter whose
//! changes are broadcast on a `tokio::sync::watch` channel. Receivers only
//! see the latest value, so several requests inside one turn of the event
//! loop collapse into one redraw.

use std::sync::Arc;

use tokio::sync::watch;

/// Generation values wrap back to zero at this bound.
pub const MAX_GENERATION: u64 = (1 << 53) - 1;

/// Observer notified when a re-render is required.
pub trait RenderSignal: Send + Sync {
    /// Request a re-render. Callable any number of times.
    fn request_render(&self);
}

impl<F> RenderSignal for F
where
    F: Fn() + Send + Sync,
{
    fn request_render(&self) {
        self()
    }
}

/// Monotonic (wrapping) render generation counter.
#[derive(Clone)]
pub struct RenderGeneration {
    sender: Arc<watch::Sender<u64>>,
}

impl RenderGeneration {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Current generation. Only differences between reads are meaningful.
    pub fn current(&self) -> u64 {
        *self.sender.borrow()
    }

    /// Advance by one, wrapping at [`MAX_GENERATION`].
    pub fn advance(&self) -> u64 {
        let mut next = 0;
        self.sender.send_modify(|generation| {
            *generation = (*generation + 1) % MAX_GENERATION;
            next = *generation;
        });
        next
    }

    /// Subscribe to generation changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }

    /// Number of live subscribers (hosts currently rendering).
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[cfg(test)]
    fn starting_at(generation: u64) -> Self {
        let (sender, _) = watch::channel(generation);
        Self {
            sender: Arc::new(sender),
        }
    }
}

impl Default for RenderGeneration {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSignal for RenderGeneration {
    fn request_render(&self) {
        let generation = self.advance();
        tracing::trace!(generation, "render requested");
    }
}

impl std::fmt::Debug for RenderGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderGeneration")
            .field("current", &self.current())
            .finish()
    }
}
