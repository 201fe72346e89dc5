mod di;

pub use self::di::*;
use crate::WhiteNoise;

/// Streaming weighted-reservoir sampler.
///
/// - `sample` is the currently selected sample,
/// - `w_sum` is the sum of weights of all candidates seen so far,
/// - `m` is the number of candidates seen so far,
/// - `w` is the contribution weight of `sample`, valid only after
///   [`Self::finalize()`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reservoir<T> {
    pub sample: T,
    pub w_sum: f32,
    pub m: f32,
    pub w: f32,
}

impl<T> Reservoir<T>
where
    T: Clone + Copy,
{
    /// Feeds a candidate into the reservoir, returning whether it got
    /// selected.
    ///
    /// A candidate replaces the current selection with probability
    /// `weight / w_sum`; the comparison is strict, so under a tie the earlier
    /// selection is kept.
    pub fn update(
        &mut self,
        wnoise: &mut WhiteNoise,
        sample: T,
        weight: f32,
    ) -> bool {
        let weight = if weight.is_finite() {
            weight.max(0.0)
        } else {
            0.0
        };

        self.m += 1.0;
        self.w_sum += weight;

        if wnoise.sample() * self.w_sum < weight {
            self.sample = sample;
            true
        } else {
            false
        }
    }

    /// Combines another (finalized) reservoir into this one.
    ///
    /// `rhs` is treated as a single candidate of weight `pdf * rhs.w * rhs.m`,
    /// where `pdf` is the target pdf of `rhs.sample` evaluated for the owner of
    /// `self`; `rhs` contributes all of its `m` candidates.
    ///
    /// Merging an empty reservoir is a no-op.
    pub fn merge(
        &mut self,
        wnoise: &mut WhiteNoise,
        rhs: &Self,
        pdf: f32,
    ) -> bool {
        if rhs.m <= 0.0 {
            return false;
        }

        self.m += rhs.m - 1.0;
        self.update(wnoise, rhs.sample, pdf * rhs.w * rhs.m)
    }

    /// Computes the contribution weight of the selected sample, given its
    /// target pdf.
    pub fn finalize(&mut self, pdf: f32) {
        let denom = self.m * pdf;

        self.w = if denom > 0.0 { self.w_sum / denom } else { 0.0 };
    }

    /// Caps the number of candidates this reservoir claims to represent, so
    /// that old samples can't dominate forever.
    pub fn clamp_m(&mut self, max: f32) {
        self.m = self.m.min(max);
    }

    pub fn is_empty(&self) -> bool {
        self.m <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::uvec2;

    use super::*;

    /// Values of the integrand over a discrete domain.
    const F: [f32; 4] = [1.0, 2.0, 3.0, 4.0];

    /// Target function, proportional to neither `F` nor the proposal.
    const P_HAT: [f32; 4] = [1.5, 2.5, 1.0, 6.0];

    /// Builds a reservoir out of `n` candidates drawn uniformly from the
    /// domain.
    fn stream(wnoise: &mut WhiteNoise, n: usize) -> Reservoir<usize> {
        let mut reservoir = Reservoir::default();

        for _ in 0..n {
            let x = ((wnoise.sample() * 4.0) as usize).min(3);

            reservoir.update(wnoise, x, P_HAT[x] / 0.25);
        }

        reservoir.finalize(P_HAT[reservoir.sample]);
        reservoir
    }

    #[test]
    fn merging_is_unbiased() {
        const TRIALS: usize = 100_000;

        let expected: f32 = F.iter().sum();
        let mut wnoise = WhiteNoise::new(1234, uvec2(0, 0));
        let mut merged_sum = 0.0f64;
        let mut single_sum = 0.0f64;

        for _ in 0..TRIALS {
            let mut lhs = stream(&mut wnoise, 3);
            let rhs = stream(&mut wnoise, 5);

            lhs.merge(&mut wnoise, &rhs, P_HAT[rhs.sample]);
            lhs.finalize(P_HAT[lhs.sample]);

            assert_eq!(8.0, lhs.m);

            merged_sum += (F[lhs.sample] * lhs.w) as f64;

            // ---

            let single = stream(&mut wnoise, 8);

            single_sum += (F[single.sample] * single.w) as f64;
        }

        let merged = (merged_sum / TRIALS as f64) as f32;
        let single = (single_sum / TRIALS as f64) as f32;

        assert_relative_eq!(expected, merged, epsilon = 0.2);
        assert_relative_eq!(expected, single, epsilon = 0.2);
        assert_relative_eq!(single, merged, epsilon = 0.2);
    }

    #[test]
    fn weights_are_never_negative() {
        let mut wnoise = WhiteNoise::new(5, uvec2(1, 2));
        let mut target = Reservoir::default();

        for (idx, weight) in
            [1.0, -3.0, f32::NAN, 0.0, f32::INFINITY, 2.0, -0.5]
                .into_iter()
                .enumerate()
        {
            target.update(&mut wnoise, idx, weight);

            assert!(target.w_sum >= 0.0);
        }

        assert_eq!(7.0, target.m);
        assert_eq!(3.0, target.w_sum);
        assert!(target.sample == 0 || target.sample == 5);

        target.finalize(1.0);

        assert!(target.w >= 0.0);

        target.finalize(0.0);

        assert_eq!(0.0, target.w);
    }

    #[test]
    fn merging_empty_reservoir_is_noop() {
        let mut wnoise = WhiteNoise::new(1, uvec2(0, 0));
        let mut target = stream(&mut wnoise, 4);
        let original = target;

        assert!(!target.merge(&mut wnoise, &Reservoir::default(), 123.0));
        assert_eq!(original, target);
    }

    #[test]
    fn merging_into_empty_reservoir_adopts_sample() {
        let mut wnoise = WhiteNoise::new(1, uvec2(0, 0));
        let rhs = stream(&mut wnoise, 4);
        let mut target = Reservoir::default();

        assert!(target.merge(&mut wnoise, &rhs, P_HAT[rhs.sample]));
        assert_eq!(rhs.sample, target.sample);
        assert_eq!(rhs.m, target.m);

        target.finalize(P_HAT[target.sample]);

        assert_relative_eq!(rhs.w, target.w, epsilon = 0.0001);
    }

    #[test]
    fn zero_weights_are_never_selected() {
        let mut wnoise = WhiteNoise::new(1, uvec2(0, 0));
        let mut target = Reservoir::default();

        for idx in 0..100 {
            assert!(!target.update(&mut wnoise, idx, 0.0));
        }

        assert_eq!(100.0, target.m);
        assert_eq!(0, target.sample);

        target.finalize(1.0);

        assert_eq!(0.0, target.w);
    }

    #[test]
    fn clamp_m() {
        let mut wnoise = WhiteNoise::new(1, uvec2(0, 0));
        let mut target = stream(&mut wnoise, 50);
        let w = target.w;

        target.clamp_m(20.0);

        assert_eq!(20.0, target.m);
        assert_eq!(w, target.w);

        target.clamp_m(30.0);

        assert_eq!(20.0, target.m);
    }
}
