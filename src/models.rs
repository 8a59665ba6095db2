use crate::screening::checks::Check;

/// The ratio test that turned an image away
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rejection {
    pub check: Check,
    pub ratio: f64,
    pub cutoff: f64,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.check {
            Check::Vegetation => write!(
                f,
                "not enough plant color (plant ratio {:.3} < {:.3})",
                self.ratio, self.cutoff
            ),
            Check::Metallic => write!(
                f,
                "mostly gray or metallic (gray ratio {:.3} > {:.3})",
                self.ratio, self.cutoff
            ),
            Check::Skin => write!(
                f,
                "too much skin tone (skin ratio {:.3} > {:.3})",
                self.ratio, self.cutoff
            ),
            Check::Overexposure => write!(
                f,
                "overexposed (bright ratio {:.3} > {:.3})",
                self.ratio, self.cutoff
            ),
            Check::Underexposure => write!(
                f,
                "underexposed (dark ratio {:.3} > {:.3})",
                self.ratio, self.cutoff
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Accept => None,
            Verdict::Reject(rejection) => Some(rejection),
        }
    }
}

/// All five ratios of one image, measured without short-circuiting
#[derive(Debug, Clone, PartialEq)]
pub struct PlausibilityReport {
    pub plant_ratio: f64,
    pub gray_ratio: f64,
    pub skin_ratio: f64,
    pub overexposed_ratio: f64,
    pub underexposed_ratio: f64,
    /// First rejection in evaluation order, same as `PlausibilityFilter::evaluate`
    pub verdict: Verdict,
}

impl PlausibilityReport {
    pub fn ratio(&self, check: Check) -> f64 {
        match check {
            Check::Vegetation => self.plant_ratio,
            Check::Metallic => self.gray_ratio,
            Check::Skin => self.skin_ratio,
            Check::Overexposure => self.overexposed_ratio,
            Check::Underexposure => self.underexposed_ratio,
        }
    }
}
