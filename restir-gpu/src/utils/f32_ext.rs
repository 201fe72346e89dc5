pub trait F32Ext
where
    Self: Sized,
{
    fn sqr(self) -> Self;
    fn saturate(self) -> Self;

    /// Returns `self / rhs`, or zero if `rhs` is too small to divide by.
    fn safe_div(self, rhs: Self) -> Self;
}

impl F32Ext for f32 {
    fn sqr(self) -> Self {
        self * self
    }

    fn saturate(self) -> Self {
        self.clamp(0.0, 1.0)
    }

    fn safe_div(self, rhs: Self) -> Self {
        if rhs.abs() < crate::RESTIR_EPSILON {
            0.0
        } else {
            self / rhs
        }
    }
}
