use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Seedable source of cosmetic choices, such as which car model to use.
#[derive(Resource)]
pub struct VariantPicker {
    rng: StdRng,
}

impl VariantPicker {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }

    pub fn pick<'a, T>(&mut self, pool: &'a [T]) -> Option<&'a T> {
        pool.choose(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_choices() {
        let pool = ["a", "b", "c", "d"];
        let mut first = VariantPicker::from_seed(42);
        let mut second = VariantPicker::from_seed(42);
        for _ in 0..16 {
            assert_eq!(first.pick(&pool), second.pick(&pool));
        }
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let mut picker = VariantPicker::from_seed(1);
        assert_eq!(picker.pick::<&str>(&[]), None);
    }
}
