use crate::error::{DashError, DashResult};

/// Maps a numeric domain onto a pixel extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> DashResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(DashError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    /// Builds a scale covering `[0, max]`, falling back to `[0, 1]` when every
    /// value is zero or negative.
    pub fn from_zero_to_max<'a>(values: impl IntoIterator<Item = &'a f64>) -> DashResult<Self> {
        let max = values
            .into_iter()
            .copied()
            .filter(|value| value.is_finite())
            .fold(0.0_f64, f64::max);
        if max > 0.0 {
            Self::new(0.0, max)
        } else {
            Self::new(0.0, 1.0)
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn domain_to_pixel(self, value: f64, extent_px: f64) -> DashResult<f64> {
        if !extent_px.is_finite() || extent_px <= 0.0 {
            return Err(DashError::InvalidData(
                "pixel extent must be finite and > 0".to_owned(),
            ));
        }
        if !value.is_finite() {
            return Err(DashError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(normalized * extent_px)
    }

    pub fn pixel_to_domain(self, pixel: f64, extent_px: f64) -> DashResult<f64> {
        if !extent_px.is_finite() || extent_px <= 0.0 {
            return Err(DashError::InvalidData(
                "pixel extent must be finite and > 0".to_owned(),
            ));
        }
        if !pixel.is_finite() {
            return Err(DashError::InvalidData("pixel must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = pixel / extent_px;
        Ok(self.domain_start + normalized * span)
    }
}
