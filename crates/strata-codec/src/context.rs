use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{CodecError, CodecResult};

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct CancelNode {
    flag: AtomicBool,
    parent: Option<Arc<CancelNode>>,
}

impl CancelNode {
    fn is_cancelled(&self) -> bool {
        let mut node = Some(self);
        while let Some(current) = node {
            if current.flag.load(Ordering::Acquire) {
                return true;
            }
            node = current.parent.as_deref();
        }
        false
    }
}

/// Cancellation token.
///
/// Clones share one state. A [`Cancellation::child`] is cancelled when it or
/// any of its ancestors is cancelled; cancelling a child leaves the parent
/// and its other children live.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    node: Arc<CancelNode>,
}

impl Cancellation {
    /// A token in the "not cancelled" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this token or one of its ancestors has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.node.is_cancelled()
    }

    /// Mark the token cancelled.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn cancel(&self) -> bool {
        self.node
            .flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// A new token linked to this one.
    pub fn child(&self) -> Self {
        Self {
            node: Arc::new(CancelNode {
                flag: AtomicBool::new(false),
                parent: Some(Arc::clone(&self.node)),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

/// Optional point in time after which work should not start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deadline {
    instant: Option<Instant>,
}

impl Deadline {
    /// No deadline.
    pub const fn none() -> Self {
        Self { instant: None }
    }

    /// A deadline at the given instant.
    pub fn at(instant: Instant) -> Self {
        Self {
            instant: Some(instant),
        }
    }

    /// A deadline `timeout` from now.
    ///
    /// A timeout too large to represent as an [`Instant`] means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(instant) => Self::at(instant),
            None => Self::none(),
        }
    }

    /// The deadline instant, if set.
    pub fn instant(&self) -> Option<Instant> {
        self.instant
    }

    /// Whether the deadline has passed at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.instant.is_some_and(|deadline| now >= deadline)
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Per-call context threaded through every `encode`/`decode`.
///
/// Decorators only forward it. Serializers check it before doing any work;
/// once a collaborator call is running it is not interrupted.
#[derive(Clone, Debug, Default)]
pub struct Context {
    cancellation: Cancellation,
    deadline: Deadline,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Replace the cancellation token.
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Replace the deadline.
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Deadline::with_timeout(timeout))
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Fail with [`CodecError::Cancelled`] or [`CodecError::DeadlineExceeded`]
    /// if the context is no longer live.
    pub fn ensure_active(&self) -> CodecResult<()> {
        if self.cancellation.is_cancelled() {
            return Err(CodecError::Cancelled);
        }
        if self.deadline.is_expired() {
            return Err(CodecError::DeadlineExceeded);
        }
        Ok(())
    }
}
