//! Display window: how many tickets are revealed from the top of the list.

use std::num::NonZeroUsize;

/// Count of leading tickets revealed to the consumer.
///
/// Starts at [`DisplayWindow::STEP`] and only grows within a search
/// lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayWindow(NonZeroUsize);

impl DisplayWindow {
    /// Initial size and the default growth increment.
    pub const STEP: NonZeroUsize = match NonZeroUsize::new(5) {
        Some(n) => n,
        None => unreachable!(),
    };

    pub fn new() -> Self {
        Self(Self::STEP)
    }

    pub fn size(&self) -> usize {
        self.0.get()
    }

    /// Grow by `by` tickets, saturating at `usize::MAX`.
    pub fn grow(&mut self, by: NonZeroUsize) {
        self.0 = self.0.saturating_add(by.get());
    }
}

impl Default for DisplayWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_five() {
        assert_eq!(DisplayWindow::new().size(), 5);
    }

    #[test]
    fn grows_by_requested_amount() {
        let mut window = DisplayWindow::new();
        window.grow(DisplayWindow::STEP);
        assert_eq!(window.size(), 10);

        window.grow(NonZeroUsize::new(3).unwrap());
        assert_eq!(window.size(), 13);
    }

    #[test]
    fn growth_saturates() {
        let mut window = DisplayWindow::new();
        window.grow(NonZeroUsize::MAX);
        window.grow(DisplayWindow::STEP);
        assert_eq!(window.size(), usize::MAX);
    }
}
