use super::XYWH;
use crate::{common::*, HW};

/// Rescale coordinates from one image size onto another, each axis independently.
///
/// A coordinate `x` maps to `x / src.w * tgt.w`. The division comes first so
/// that exact pixel ratios such as `85 / 640 * 448 = 59.5` stay exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    src: HW<T>,
    tgt: HW<T>,
}

impl<T> Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn try_from_sizes_exact(src_size: HW<T>, tgt_size: HW<T>) -> Result<Self> {
        ensure!(
            !src_size.is_degenerate(),
            "source size must have non-zero height and width"
        );
        Ok(Self {
            src: src_size,
            tgt: tgt_size,
        })
    }

    pub fn src_size(&self) -> HW<T> {
        self.src
    }

    pub fn tgt_size(&self) -> HW<T> {
        self.tgt
    }

    /// The transform mapping the target size back onto the source size.
    pub fn inverse(&self) -> Result<Self> {
        Self::try_from_sizes_exact(self.tgt, self.src)
    }

    pub fn scale_x(&self, x: T) -> T {
        x / self.src.w() * self.tgt.w()
    }

    pub fn scale_y(&self, y: T) -> T {
        y / self.src.h() * self.tgt.h()
    }
}

impl<T> Mul<&XYWH<T>> for &Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    type Output = XYWH<T>;

    fn mul(self, rhs: &XYWH<T>) -> Self::Output {
        rhs.transform(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RectNum;
    use approx::assert_abs_diff_eq;

    fn transform(src: [f64; 2], tgt: [f64; 2]) -> Transform<f64> {
        Transform::try_from_sizes_exact(HW::from_hw(src), HW::from_hw(tgt)).unwrap()
    }

    #[test]
    fn rect_transform_inverse() {
        let orig = transform([540.0, 960.0], [448.0, 448.0]);
        let inverse = orig.inverse().unwrap();
        assert_eq!(inverse.src_size(), orig.tgt_size());
        assert_eq!(inverse.inverse().unwrap(), orig);

        let rect = XYWH::from_xywh([100.0, 50.0, 40.0, 80.0]);
        let back = &inverse * &(&orig * &rect);
        back.xywh()
            .into_iter()
            .zip(rect.xywh())
            .for_each(|(lhs, rhs)| assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-9));
    }

    #[test]
    fn rect_resize_exact() {
        let transform = transform([80.0, 80.0], [20.0, 40.0]);
        let rect = &transform * &XYWH::from_xywh([40.0, 40.0, 20.0, 20.0]);
        assert_eq!(rect.xywh(), [20.0, 10.0, 10.0, 5.0]);
    }

    #[test]
    fn rect_resize_same_size_keeps_coordinates() {
        let transform = transform([540.0, 960.0], [540.0, 960.0]);

        let rect = XYWH::from_xywh([100.0, 50.0, 40.0, 80.0]);
        (&transform * &rect)
            .xywh()
            .into_iter()
            .zip(rect.xywh())
            .for_each(|(lhs, rhs)| assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-9));
        assert_eq!((&transform * &rect).round_ties_even(), rect);
    }

    #[test]
    fn rect_resize_rejects_empty_source() {
        let result =
            Transform::try_from_sizes_exact(HW::from_hw([0.0, 80.0]), HW::from_hw([20.0, 40.0]));
        assert!(result.is_err());
    }

    #[test]
    fn rect_transform_xywh() {
        let transform = transform([540.0, 960.0], [448.0, 448.0]);
        let rect = &transform * &XYWH::from_xywh([960.0, 540.0, 480.0, 270.0]);
        assert_eq!(rect.xywh(), [448.0, 448.0, 224.0, 224.0]);
    }

    #[test]
    fn rescaled_ties_round_half_to_even() {
        // (native width, x, x / width * 448 rounded half-to-even)
        let cases = [
            (640.0, 45.0, 32.0),
            (640.0, 85.0, 60.0),
            (640.0, 165.0, 116.0),
            (640.0, 325.0, 228.0),
            (384.0, 105.0, 122.0),
            (384.0, 201.0, 234.0),
            (384.0, 213.0, 248.0),
            (1280.0, 90.0, 32.0),
            (1280.0, 730.0, 256.0),
            (960.0, 100.0, 47.0),
        ];

        for (width, x, expect) in cases {
            let transform = transform([width, width], [448.0, 448.0]);
            let rect = (&transform * &XYWH::from_xywh([x, x, x, x])).round_ties_even();
            assert_eq!(rect.xywh(), [expect; 4], "width {} x {}", width, x);
        }
    }
}
