use super::Rect;
use crate::{common::*, Transform};

/// Bounding box given by its top-left corner and its size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XYWH<T> {
    pub(crate) x: T,
    pub(crate) y: T,
    pub(crate) w: T,
    pub(crate) h: T,
}

impl<T> XYWH<T>
where
    T: Copy,
{
    pub fn x(&self) -> T {
        self.x
    }

    pub fn y(&self) -> T {
        self.y
    }
}

impl<T> XYWH<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        XYWH {
            x: transform.scale_x(self.x),
            y: transform.scale_y(self.y),
            w: transform.scale_x(self.w),
            h: transform.scale_y(self.h),
        }
    }
}

impl XYWH<f64> {
    /// Round every component half-to-even.
    pub fn round_ties_even(&self) -> Self {
        XYWH {
            x: self.x.round_ties_even(),
            y: self.y.round_ties_even(),
            w: self.w.round_ties_even(),
            h: self.h.round_ties_even(),
        }
    }
}

impl<T> Rect for XYWH<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.y
    }

    fn l(&self) -> Self::Type {
        self.x
    }

    fn b(&self) -> Self::Type {
        self.y + self.h
    }

    fn r(&self) -> Self::Type {
        self.x + self.w
    }

    fn h(&self) -> Self::Type {
        self.h
    }

    fn w(&self) -> Self::Type {
        self.w
    }

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");

        Ok(Self {
            x: l,
            y: t,
            w: r - l,
            h: b - t,
        })
    }

    fn try_from_xywh(xywh: [Self::Type; 4]) -> Result<Self> {
        let [x, y, w, h] = xywh;
        let zero = T::zero();
        ensure!(
            w >= zero && h >= zero,
            "box width and height must be non-negative"
        );

        Ok(Self { x, y, w, h })
    }
}
