//! Long-running request indicator.

/// A caller-supplied indicator shown while a request is in flight.
///
/// The dispatcher calls `acquire` once before the network call and `release`
/// once when the response status arrives. If several calls share one handle,
/// the handle decides how overlapping show/hide requests combine.
pub trait ProgressHandle: Send + Sync {
    fn acquire(&self);

    fn release(&self);
}

impl<P: ProgressHandle + ?Sized> ProgressHandle for std::sync::Arc<P> {
    fn acquire(&self) {
        (**self).acquire();
    }

    fn release(&self) {
        (**self).release();
    }
}

/// Releases the handle at most once: explicitly, or on drop if the call
/// never got that far.
pub(crate) struct ProgressGuard<'a> {
    handle: Option<&'a dyn ProgressHandle>,
}

impl<'a> ProgressGuard<'a> {
    pub(crate) fn acquire(handle: Option<&'a dyn ProgressHandle>) -> Self {
        if let Some(handle) = handle {
            handle.acquire();
        }
        Self { handle }
    }

    pub(crate) fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Counter {
        acquired: AtomicUsize,
        released: AtomicUsize,
    }

    impl ProgressHandle for Counter {
        fn acquire(&self) {
            self.acquired.fetch_add(1, Ordering::SeqCst);
        }

        fn release(&self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn explicit_release_is_not_repeated_on_drop() {
        let counter = Counter::default();
        {
            let mut guard = ProgressGuard::acquire(Some(&counter));
            guard.release();
            guard.release();
        }
        assert_eq!(counter.acquired.load(Ordering::SeqCst), 1);
        assert_eq!(counter.released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases_unreleased_handle() {
        let counter = Counter::default();
        drop(ProgressGuard::acquire(Some(&counter)));
        assert_eq!(counter.released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn absent_handle_is_a_no_op() {
        let mut guard = ProgressGuard::acquire(None);
        guard.release();
    }
}
