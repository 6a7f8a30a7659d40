/// Seedable session RNG.
///
/// Implements `RngCore`, so the whole `rand::Rng` / `SliceRandom` surface
/// (`gen_bool`, `choose`, ...) works on it directly. A fixed seed pins every
/// random-neighbor step and frightened deviation for replay and tests.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        SimRng(SmallRng::from_entropy())
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise.
    pub fn from_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => Self::from_entropy(),
        }
    }
}

impl RngCore for SimRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::Rng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..100)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn choose_and_gen_bool_work_through_rng_traits() {
        let mut r = SimRng::from_option(Some(3));
        let opts = [1, 2, 3];
        assert!(opts.choose(&mut r).is_some());
        let empty: [i32; 0] = [];
        assert!(empty.choose(&mut r).is_none());
        assert!(!r.gen_bool(0.0));
        assert!(r.gen_bool(1.0));
    }
}
