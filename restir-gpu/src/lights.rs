use crate::{AreaLight, LightId, LightSampling, WhiteNoise};

#[derive(Clone, Copy, Debug)]
pub struct LightsView<'a> {
    buffer: &'a [AreaLight],
}

impl<'a> LightsView<'a> {
    pub fn new(buffer: &'a [AreaLight]) -> Self {
        Self { buffer }
    }

    /// Returns light with given id; lights that don't exist (e.g. because they
    /// got removed since the sample referring to them was generated) come back
    /// as [`AreaLight::is_none()`].
    pub fn get(self, id: LightId) -> AreaLight {
        self.buffer
            .get(id.get() as usize)
            .copied()
            .unwrap_or_default()
    }

    pub fn len(self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(self) -> bool {
        self.buffer.is_empty()
    }

    /// Picks a light, returning its id and the probability of having picked
    /// it.
    pub fn pick(
        self,
        wnoise: &mut WhiteNoise,
        sampling: LightSampling,
    ) -> Option<(LightId, f32)> {
        if self.buffer.is_empty() {
            return None;
        }

        let len = self.buffer.len();
        let u = wnoise.sample();

        match sampling {
            LightSampling::Uniform => {
                let idx = ((u * len as f32) as usize).min(len - 1);

                Some((LightId::new(idx as u32), 1.0 / len as f32))
            }

            LightSampling::Power => {
                let idx = self
                    .buffer
                    .partition_point(|light| light.pick_cdf() <= u)
                    .min(len - 1);

                Some((LightId::new(idx as u32), self.buffer[idx].pick_pdf()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, Vec3};

    use super::*;

    fn lights() -> Vec<AreaLight> {
        let light = |intensity| {
            AreaLight::new(Vec3::ZERO, Vec3::Y, Vec3::ONE, intensity, 1.0, 1.0)
        };

        vec![
            light(1.0).with_pick(0.1, 0.1),
            light(0.0).with_pick(0.0, 0.1),
            light(9.0).with_pick(0.9, 1.0),
        ]
    }

    #[test]
    fn pick_uniform() {
        let lights = lights();
        let target = LightsView::new(&lights);
        let mut wnoise = WhiteNoise::new(123, uvec2(0, 0));
        let mut counts = [0; 3];

        for _ in 0..3000 {
            let (id, pdf) =
                target.pick(&mut wnoise, LightSampling::Uniform).unwrap();

            assert_eq!(1.0 / 3.0, pdf);
            counts[id.get() as usize] += 1;
        }

        for count in counts {
            assert!(count > 900 && count < 1100, "counts={counts:?}");
        }
    }

    #[test]
    fn pick_power() {
        let lights = lights();
        let target = LightsView::new(&lights);
        let mut wnoise = WhiteNoise::new(321, uvec2(0, 0));
        let mut counts = [0; 3];

        for _ in 0..10_000 {
            let (id, pdf) =
                target.pick(&mut wnoise, LightSampling::Power).unwrap();

            assert_eq!(lights[id.get() as usize].pick_pdf(), pdf);
            counts[id.get() as usize] += 1;
        }

        // Lights with zero power must never get picked
        assert_eq!(0, counts[1]);
        assert!(counts[0] > 800 && counts[0] < 1200, "counts={counts:?}");
    }

    #[test]
    fn missing_lights() {
        let lights = lights();
        let target = LightsView::new(&lights);

        assert!(target.get(LightId::new(3)).is_none());

        assert!(LightsView::new(&[])
            .pick(&mut WhiteNoise::new(0, uvec2(0, 0)), LightSampling::Power)
            .is_none());
    }
}
