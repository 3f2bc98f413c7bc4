use rand::Rng;
use std::ops::RangeInclusive;

/// Draws the base of an order's per-vendor security codes.
///
/// Vendor `i` (first-seen order) is handed `base + i`.
pub fn draw_base_code<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<u32>) -> u32 {
    rng.gen_range(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn codes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let code = draw_base_code(&mut rng, 10000..=99999);
            assert!((10000..=99999).contains(&code));
        }
    }

    #[test]
    fn single_value_range_is_fixed() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(draw_base_code(&mut rng, 54321..=54321), 54321);
    }
}
