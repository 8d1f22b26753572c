use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

/// Duration of one arc transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(750);

/// Symmetric cubic easing over `[0, 1]`.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Angular extent of one pie arc, in radians clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArcAngles {
    pub start: f64,
    pub end: f64,
}

impl ArcAngles {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn lerp(self, target: Self, t: f64) -> Self {
        Self {
            start: self.start + (target.start - self.start) * t,
            end: self.end + (target.end - self.end) * t,
        }
    }

    /// Midpoint of the arc on a circle of `radius`, relative to the pie centre.
    #[must_use]
    pub fn centroid(self, radius: f64) -> (f64, f64) {
        let angle = (self.start + self.end) / 2.0 - FRAC_PI_2;
        (angle.cos() * radius, angle.sin() * radius)
    }
}

/// Running interpolation between two arc extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcTransition {
    from: ArcAngles,
    to: ArcAngles,
    elapsed: Duration,
    duration: Duration,
}

impl ArcTransition {
    #[must_use]
    pub fn new(from: ArcAngles, to: ArcAngles) -> Self {
        Self::with_duration(from, to, TRANSITION_DURATION)
    }

    #[must_use]
    pub fn with_duration(from: ArcAngles, to: ArcAngles, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    #[must_use]
    pub fn target(&self) -> ArcAngles {
        self.to
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    #[must_use]
    pub fn value(&self) -> ArcAngles {
        self.from.lerp(self.to, ease_cubic_in_out(self.progress()))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Moves the transition forward and returns the interpolated extent.
    pub fn advance(&mut self, elapsed: Duration) -> ArcAngles {
        self.elapsed = self.elapsed.saturating_add(elapsed).min(self.duration);
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::{ArcAngles, ArcTransition, ease_cubic_in_out};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;
    use std::time::Duration;

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_relative_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_relative_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_relative_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
    }

    #[test]
    fn transition_reaches_target_after_duration() {
        let from = ArcAngles::new(0.0, PI);
        let to = ArcAngles::new(0.0, PI / 2.0);
        let mut transition = ArcTransition::new(from, to);

        let half = transition.advance(Duration::from_millis(375));
        assert_relative_eq!(half.end, PI * 0.75);
        assert!(!transition.is_finished());

        let done = transition.advance(Duration::from_secs(5));
        assert_eq!(done, to);
        assert!(transition.is_finished());
    }

    #[test]
    fn centroid_of_top_right_quarter_points_up_right() {
        let (x, y) = ArcAngles::new(0.0, PI / 2.0).centroid(10.0);
        assert!(x > 0.0);
        assert!(y < 0.0);
        assert_relative_eq!(x, -y, epsilon = 1e-9);
    }
}
