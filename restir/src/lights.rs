use std::collections::hash_map::Entry;
use std::mem;

use fxhash::FxHashMap;

use crate::{
    gpu, Device, HemisphereLights, Light, Params, Result, StorageBuffer,
};

/// Scene's lights: the procedural hemisphere rig (if any), followed by lights
/// added by the application.
///
/// Light ids stay the same as long as lights are only updated, so that the
/// history reservoirs keep pointing at the right lights.
#[derive(Debug)]
pub struct Lights<P>
where
    P: Params,
{
    hemisphere: Option<HemisphereLights>,
    lights: Vec<Light>,
    index: FxHashMap<P::LightHandle, usize>,
    buffer: StorageBuffer<gpu::AreaLight>,
    dirty: bool,
}

impl<P> Lights<P>
where
    P: Params,
{
    pub fn new(device: &Device) -> Result<Self> {
        Ok(Self {
            hemisphere: None,
            lights: Default::default(),
            index: Default::default(),
            buffer: StorageBuffer::new(device, "restir_lights", 0)?,
            dirty: false,
        })
    }

    pub fn set_hemisphere(&mut self, hemisphere: Option<HemisphereLights>) {
        self.hemisphere = hemisphere;
        self.dirty = true;
    }

    pub fn add(&mut self, light_handle: P::LightHandle, light: Light) {
        match self.index.entry(light_handle) {
            Entry::Occupied(entry) => {
                self.lights[*entry.get()] = light;
            }

            Entry::Vacant(entry) => {
                entry.insert(self.lights.len());
                self.lights.push(light);
            }
        }

        self.dirty = true;
    }

    pub fn remove(&mut self, light_handle: &P::LightHandle) {
        let Some(light_idx) = self.index.remove(light_handle) else {
            return;
        };

        self.lights.remove(light_idx);

        for light_idx2 in self.index.values_mut() {
            if *light_idx2 > light_idx {
                *light_idx2 -= 1;
            }
        }

        self.dirty = true;
    }

    pub fn buffer(&self) -> &StorageBuffer<gpu::AreaLight> {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Uploads lights changed since the last flush.
    pub fn flush(&mut self, device: &Device) -> Result<()> {
        if !mem::take(&mut self.dirty) {
            return Ok(());
        }

        let hemisphere = self
            .hemisphere
            .as_ref()
            .map(|hemisphere| hemisphere.build())
            .unwrap_or_default();

        let mut lights: Vec<_> = hemisphere
            .iter()
            .chain(&self.lights)
            .map(|light| light.serialize())
            .collect();

        Self::build_distribution(&mut lights);

        self.buffer.write_all(device, lights)
    }

    /// Re-creates the device-side buffer, e.g. after the device got lost.
    pub fn recreate(&mut self, device: &Device) -> Result<()> {
        self.buffer = StorageBuffer::new(device, "restir_lights", 0)?;
        self.dirty = true;
        self.flush(device)
    }

    /// Fills each light's probability of getting picked, proportional to its
    /// power; when no light emits anything, all lights are equally probable.
    fn build_distribution(lights: &mut [gpu::AreaLight]) {
        let total_power: f32 = lights.iter().map(|light| light.power()).sum();
        let count = lights.len();
        let mut cdf = 0.0;

        for (light_idx, light) in lights.iter_mut().enumerate() {
            let pdf = if total_power > 0.0 {
                light.power() / total_power
            } else {
                1.0 / count as f32
            };

            cdf += pdf;

            let cdf = if light_idx + 1 == count {
                1.0
            } else {
                cdf
            };

            *light = light.with_pick(pdf, cdf);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec2, vec3, Vec3};

    use super::*;

    #[derive(Debug)]
    struct TestParams;

    impl Params for TestParams {
        type MeshHandle = u32;
        type MaterialHandle = u32;
        type InstanceHandle = u32;
        type LightHandle = u32;
    }

    fn light(intensity: f32) -> Light {
        Light::new(Vec3::ZERO, Vec3::NEG_Y).with_intensity(intensity)
    }

    #[test]
    fn flush() {
        let device = Device::default();
        let mut target = Lights::<TestParams>::new(&device).unwrap();

        target.set_hemisphere(Some(HemisphereLights {
            count: 2,
            intensity: 1.0,
            ..Default::default()
        }));

        target.add(10, light(1.0));
        target.add(20, light(2.0).with_size(vec2(2.0, 1.0)));
        target.flush(&device).unwrap();

        let lights = target.buffer().data();

        assert_eq!(4, lights.len());

        // Hemisphere lights come first
        assert_relative_eq!(5.0, lights[0].position().y, epsilon = 0.0001);

        // Powers are 1, 1, 1 and 4
        let expected_pdfs = [1.0 / 7.0, 1.0 / 7.0, 1.0 / 7.0, 4.0 / 7.0];
        let expected_cdfs = [1.0 / 7.0, 2.0 / 7.0, 3.0 / 7.0, 1.0];

        for (light, (pdf, cdf)) in
            lights.iter().zip(expected_pdfs.into_iter().zip(expected_cdfs))
        {
            assert_relative_eq!(pdf, light.pick_pdf(), epsilon = 0.0001);
            assert_relative_eq!(cdf, light.pick_cdf(), epsilon = 0.0001);
        }
    }

    #[test]
    fn flush_with_dark_lights() {
        let device = Device::default();
        let mut target = Lights::<TestParams>::new(&device).unwrap();

        target.add(1, light(0.0));
        target.add(2, light(0.0));
        target.flush(&device).unwrap();

        let lights = target.buffer().data();

        assert_eq!(0.5, lights[0].pick_pdf());
        assert_eq!(0.5, lights[0].pick_cdf());
        assert_eq!(0.5, lights[1].pick_pdf());
        assert_eq!(1.0, lights[1].pick_cdf());
    }

    #[test]
    fn add_and_remove() {
        let device = Device::default();
        let mut target = Lights::<TestParams>::new(&device).unwrap();

        target.add(1, light(1.0));
        target.add(2, light(2.0));
        target.add(3, light(3.0));
        target.remove(&2);
        target.add(3, light(5.0).with_color(vec3(1.0, 0.0, 0.0)));
        target.flush(&device).unwrap();

        let lights = target.buffer().data();

        assert_eq!(2, lights.len());
        assert_eq!(1.0, lights[0].intensity());
        assert_eq!(5.0, lights[1].intensity());
        assert_eq!(vec3(1.0, 0.0, 0.0), lights[1].color());
    }
}
