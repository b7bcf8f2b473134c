//! Annotation records and labeled boxes.

mod odgt;
mod record;

pub use odgt::*;
pub use record::*;

use bbox::{Rect, Transform, XYWH};
use num_traits::Num;
use std::ops::Mul;

/// A rectangle paired with its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label<R, C>
where
    R: Rect,
{
    pub rect: R,
    pub class: C,
}

impl<'a, T, C> Mul<&'a Label<XYWH<T>, C>> for &'a Transform<T>
where
    T: Copy + Num + PartialOrd,
    C: Clone,
{
    type Output = Label<XYWH<T>, C>;

    fn mul(self, rhs: &'a Label<XYWH<T>, C>) -> Self::Output {
        Label {
            rect: self * &rhs.rect,
            class: rhs.class.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox::{RectNum, HW};

    #[test]
    fn label_transform_keeps_class() {
        let label = Label {
            rect: XYWH::from_xywh([10.0, 20.0, 30.0, 40.0]),
            class: "person".to_string(),
        };
        let transform =
            Transform::try_from_sizes_exact(HW::from_hw([100.0, 100.0]), HW::from_hw([50.0, 200.0]))
                .unwrap();
        let scaled = &transform * &label;
        assert_eq!(scaled.class, "person");
        assert_eq!(scaled.rect.xywh(), [20.0, 10.0, 60.0, 20.0]);
    }
}
