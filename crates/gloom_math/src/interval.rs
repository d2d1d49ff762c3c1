/// Closed extent `[min, max]` of a bounding box along one axis.
///
/// `min > max` marks an interval with no points; [`Interval::EMPTY`] is the
/// identity for [`Interval::include`] and [`Interval::surrounding`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Length of the extent. Negative for empty intervals.
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Inclusive at both ends.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Nearest value inside the extent. Meaningless on an empty interval.
    pub fn clamp(&self, value: f32) -> f32 {
        // f32::clamp panics when min > max
        value.max(self.min).min(self.max)
    }

    /// Smallest interval holding `self` and `value`.
    pub fn include(&self, value: f32) -> Interval {
        Interval {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    /// Smallest interval holding both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }
}
