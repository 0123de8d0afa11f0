//! Tick-side selection
//!
//! Sides are named as seen when walking along a scale towards increasing
//! values. `u` always runs upwards, so its ticks sit on the left, outside the
//! chart. `v` gets the side facing off the right edge, which is its left when
//! it runs downwards. `w` defaults to its right. When `w`, the inner scale,
//! runs close to either outer scale, its ticks move to its left. Curve
//! geometry is never changed here.

use std::fmt;

use crate::cost::enclosed_area;
use crate::layout::{Orientation, ScaleCurve};
use crate::types::ScaleId;

/// Side of a scale curve on which tick marks and labels are drawn, relative
/// to the direction of increasing value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSide {
    Left,
    Right,
}

impl TickSide {
    /// Side for a scale running upwards
    pub const fn default_for(id: ScaleId) -> TickSide {
        match id {
            ScaleId::U => TickSide::Left,
            ScaleId::V | ScaleId::W => TickSide::Right,
        }
    }

    /// Side facing out of the chart for `u` and `v`, and the default right
    /// side for `w`
    pub const fn outward(id: ScaleId, orientation: Orientation) -> TickSide {
        match id {
            ScaleId::V if orientation.v_flipped => TickSide::Left,
            _ => TickSide::default_for(id),
        }
    }

    pub const fn flipped(self) -> TickSide {
        match self {
            TickSide::Left => TickSide::Right,
            TickSide::Right => TickSide::Left,
        }
    }
}

impl fmt::Display for TickSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickSide::Left => write!(f, "left"),
            TickSide::Right => write!(f, "right"),
        }
    }
}

/// Chosen tick sides with the area measures that decided them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    pub u: TickSide,
    pub v: TickSide,
    pub w: TickSide,
    /// Area measure between `u` and `w`; `None` when the endpoint pairing
    /// could not be resolved
    pub uw_area: Option<f64>,
    /// Area measure between `w` and `v`; `None` when the endpoint pairing
    /// could not be resolved
    pub wv_area: Option<f64>,
}

impl TickPlan {
    /// Outward sides for every scale, before any area is measured
    pub const fn outward(orientation: Orientation) -> Self {
        TickPlan {
            u: TickSide::outward(ScaleId::U, orientation),
            v: TickSide::outward(ScaleId::V, orientation),
            w: TickSide::outward(ScaleId::W, orientation),
            uw_area: None,
            wv_area: None,
        }
    }

    pub fn side(&self, id: ScaleId) -> TickSide {
        match id {
            ScaleId::U => self.u,
            ScaleId::V => self.v,
            ScaleId::W => self.w,
        }
    }

    /// Whether either pairing had no measurable area
    pub fn unresolved(&self) -> bool {
        self.uw_area.is_none() || self.wv_area.is_none()
    }
}

/// Choose tick sides for `[u, v, w]`.
///
/// A pair whose area measure exceeds `closeness` counts as running close
/// together. A pair whose endpoint pairing is ambiguous counts as apart, so
/// a finished layout always gets a plan.
pub fn select_tick_sides(
    curves: &[ScaleCurve; 3],
    orientation: Orientation,
    closeness: f64,
) -> TickPlan {
    let [u, v, w] = curves;
    let mut plan = TickPlan::outward(orientation);
    plan.uw_area = enclosed_area(u, w).ok();
    plan.wv_area = enclosed_area(w, v).ok();

    let close = |area: Option<f64>| area.is_some_and(|a| a > closeness);
    if close(plan.uw_area) || close(plan.wv_area) {
        plan.w = plan.w.flipped();
    }
    plan
}
