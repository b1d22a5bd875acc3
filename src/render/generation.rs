//! Render generation tracking.
//!
//! Every render pass takes a [`RenderTicket`] when it starts. Any later call
//! to [`RenderGeneration::begin`] or [`RenderGeneration::invalidate`] makes
//! older tickets stale, and the compositor checks its ticket before each
//! paint so a superseded pass never draws over a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared counter of render passes.
#[derive(Debug, Clone, Default)]
pub struct RenderGeneration {
    counter: Arc<AtomicU64>,
}

impl RenderGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new pass, superseding every earlier ticket.
    pub fn begin(&self) -> RenderTicket {
        let generation = self.counter.fetch_add(1, Ordering::AcqRel) + 1;
        RenderTicket {
            counter: Some(Arc::clone(&self.counter)),
            generation,
        }
    }

    /// Supersede every outstanding ticket without starting a pass.
    pub fn invalidate(&self) {
        self.counter.fetch_add(1, Ordering::AcqRel);
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }
}

/// Token held by one render pass.
#[derive(Debug, Clone)]
pub struct RenderTicket {
    counter: Option<Arc<AtomicU64>>,
    generation: u64,
}

impl RenderTicket {
    /// A ticket that is never superseded, for one-shot renders such as export.
    pub fn detached() -> Self {
        Self {
            counter: None,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        match &self.counter {
            Some(counter) => counter.load(Ordering::Acquire) == self.generation,
            None => true,
        }
    }
}
