use glam::{vec2, vec4, IVec2, Vec2, Vec4};

/// Where a pixel's surface was during the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reprojection {
    /// Previous-frame screen position (pixel centers land on integers).
    pub prev_x: f32,
    pub prev_y: f32,

    /// Distance between the previous camera and the surface's previous
    /// position; compared against the history to detect disocclusions.
    pub prev_depth: f32,

    /// Non-zero if the surface was on-screen and in front of the previous
    /// camera.
    pub validity: u32,
}

impl Reprojection {
    pub fn serialize(&self) -> Vec4 {
        vec4(
            self.prev_x,
            self.prev_y,
            self.prev_depth,
            f32::from_bits(self.validity),
        )
    }

    pub fn deserialize(d0: Vec4) -> Self {
        Self {
            prev_x: d0.x,
            prev_y: d0.y,
            prev_depth: d0.z,
            validity: d0.w.to_bits(),
        }
    }

    pub fn is_some(&self) -> bool {
        self.validity != 0
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    pub fn prev_pos(&self) -> Vec2 {
        vec2(self.prev_x, self.prev_y)
    }

    pub fn prev_pos_round(&self) -> IVec2 {
        self.prev_pos().round().as_ivec2()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ReprojectionMap<'a> {
    buffer: &'a [Vec4],
}

impl<'a> ReprojectionMap<'a> {
    pub fn new(buffer: &'a [Vec4]) -> Self {
        Self { buffer }
    }

    pub fn get(self, idx: usize) -> Reprojection {
        Reprojection::deserialize(self.buffer[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization() {
        let target = Reprojection {
            prev_x: 123.45,
            prev_y: 234.56,
            prev_depth: 1.23,
            validity: 0xcafebabe,
        };

        let target = Reprojection::deserialize(target.serialize());

        assert_eq!(123.45, target.prev_x);
        assert_eq!(234.56, target.prev_y);
        assert_eq!(1.23, target.prev_depth);
        assert_eq!(0xcafebabe, target.validity);
    }

    #[test]
    fn prev_pos_round() {
        let target = Reprojection {
            prev_x: 1.6,
            prev_y: -0.7,
            prev_depth: 1.0,
            validity: 1,
        };

        assert_eq!(IVec2::new(2, -1), target.prev_pos_round());

    }
}
