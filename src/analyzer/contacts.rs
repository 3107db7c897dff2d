/// Number of samples whose close lies within `tolerance` (relative to the
/// EMA) of the EMA. An EMA value of zero never counts as a contact.
pub fn count_contacts(closes: &[f64], ema: &[f64], tolerance: f64) -> usize {
    closes
        .iter()
        .zip(ema)
        .filter(|&(&close, &avg)| is_contact(close, avg, tolerance))
        .count()
}

fn is_contact(close: f64, avg: f64, tolerance: f64) -> bool {
    if avg == 0.0 {
        return false;
    }
    (close - avg).abs() / avg <= tolerance
}

/// Strict running maximum over candidate periods: a later period replaces
/// the current best only with strictly more contacts, so ties keep the first.
#[derive(Debug, Clone, Default)]
pub struct BestTracker<T> {
    best: Option<(usize, T)>,
}

impl<T> BestTracker<T> {
    pub fn new() -> Self {
        Self { best: None }
    }

    pub fn offer(&mut self, contacts: usize, candidate: impl FnOnce() -> T) {
        let current = self.best.as_ref().map_or(0, |(c, _)| *c);
        if contacts > current {
            self.best = Some((contacts, candidate()));
        }
    }

    pub fn into_best(self) -> Option<(usize, T)> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ema::ema;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_walk(seed: u64, len: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut price = 50.0;
        (0..len)
            .map(|_| {
                price *= 1.0 + rng.random_range(-0.04..0.04);
                price
            })
            .collect()
    }

    #[test]
    fn counts_points_inside_band() {
        let closes = [100.0, 101.0, 102.0, 98.9];
        let avg = [100.0, 100.0, 100.0, 100.0];
        assert_eq!(count_contacts(&closes, &avg, 0.01), 2);
    }

    #[test]
    fn zero_ema_is_not_a_contact() {
        assert_eq!(count_contacts(&[0.0, 0.0], &[0.0, 0.0], 0.5), 0);
    }

    #[test]
    fn wider_tolerance_never_loses_contacts() {
        for seed in 0..20 {
            let closes = random_walk(seed, 260);
            for period in [60, 140, 220, 320] {
                let avg = ema(&closes, period);
                let mut previous = 0;
                for tolerance in [0.0, 0.002, 0.005, 0.01, 0.02, 0.05, 0.1, 1.0] {
                    let contacts = count_contacts(&closes, &avg, tolerance);
                    assert!(contacts >= previous, "seed {seed} period {period}");
                    previous = contacts;
                }
            }
        }
    }

    #[test]
    fn tracker_keeps_first_of_equal_counts() {
        let mut tracker = BestTracker::new();
        tracker.offer(3, || 60);
        tracker.offer(5, || 70);
        tracker.offer(5, || 80);
        tracker.offer(4, || 90);
        assert_eq!(tracker.into_best(), Some((5, 70)));
    }

    #[test]
    fn tracker_ignores_zero_contacts() {
        let mut tracker = BestTracker::new();
        tracker.offer(0, || 60);
        tracker.offer(0, || 70);
        assert_eq!(tracker.into_best(), None);
    }
}
