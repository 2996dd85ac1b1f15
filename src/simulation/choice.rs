//! Injectable choice of the transition to fire when several are enabled.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks one of `candidates` enabled transitions (by position in the enabled list).
///
/// Implementations must return an index in `0..candidates`; `candidates` is always > 1.
pub trait TransitionChooser {
    fn choose(&mut self, candidates: usize) -> usize;
}

impl<C: TransitionChooser + ?Sized> TransitionChooser for &mut C {
    fn choose(&mut self, candidates: usize) -> usize {
        (**self).choose(candidates)
    }
}

/// Uniform pick backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RandomChooser<R = StdRng> {
    rng: R,
}

impl RandomChooser<StdRng> {
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os_rng(),
        }
    }
}

impl<R: Rng> TransitionChooser for RandomChooser<R> {
    fn choose(&mut self, candidates: usize) -> usize {
        self.rng.random_range(0..candidates)
    }
}

/// Always fires the first enabled transition in declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEnabled;

impl TransitionChooser for FirstEnabled {
    fn choose(&mut self, _candidates: usize) -> usize {
        0
    }
}

/// Replays a fixed sequence of picks, wrapping around; out-of-range picks are clamped.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChooser {
    picks: Vec<usize>,
    cursor: usize,
}

impl ScriptedChooser {
    pub fn new(picks: impl Into<Vec<usize>>) -> Self {
        Self {
            picks: picks.into(),
            cursor: 0,
        }
    }
}

impl TransitionChooser for ScriptedChooser {
    fn choose(&mut self, candidates: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }
        let pick = self.picks[self.cursor % self.picks.len()];
        self.cursor += 1;
        pick.min(candidates - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_chooser_is_reproducible() {
        let mut a = RandomChooser::seeded(42);
        let mut b = RandomChooser::seeded(42);
        let left: Vec<_> = (0..16).map(|_| a.choose(5)).collect();
        let right: Vec<_> = (0..16).map(|_| b.choose(5)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|&pick| pick < 5));
    }

    #[test]
    fn scripted_chooser_wraps_and_clamps() {
        let mut chooser = ScriptedChooser::new(vec![1, 9]);
        assert_eq!(chooser.choose(3), 1);
        assert_eq!(chooser.choose(3), 2);
        assert_eq!(chooser.choose(2), 1);
    }
}
