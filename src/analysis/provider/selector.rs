use rand::Rng;

/// Picks a catalog index. Injected so tests can pin the outcome.
pub trait IndexSelector: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn select(&self, len: usize) -> usize;
    fn name(&self) -> &'static str;
}

/// Uniform draw from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIndexSelector;

impl IndexSelector for RandomIndexSelector {
    fn select(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }

    fn name(&self) -> &'static str {
        "RandomIndexSelector"
    }
}

/// Always returns the same index.
#[derive(Debug, Clone, Copy)]
pub struct FixedIndexSelector(pub usize);

impl IndexSelector for FixedIndexSelector {
    fn select(&self, _len: usize) -> usize {
        self.0
    }

    fn name(&self) -> &'static str {
        "FixedIndexSelector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_selector_stays_in_range_and_covers_all() {
        let selector = RandomIndexSelector;
        let mut seen = [false; 3];
        for _ in 0..500 {
            let idx = selector.select(3);
            assert!(idx < 3);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn fixed_selector_ignores_length() {
        assert_eq!(FixedIndexSelector(2).select(3), 2);
        assert_eq!(FixedIndexSelector(7).select(3), 7);
    }
}
