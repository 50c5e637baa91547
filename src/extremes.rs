//! Running maximum / minimum of the corrected temperature.
//!
//! Holds nothing until the first valid reading arrives, so no sentinel value
//! can ever leak onto the display.  Only valid readings are fed in; the
//! tracker is never reset for the life of the process.

/// Extremes seen so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes {
    pub max_c: f32,
    pub min_c: f32,
}

/// What an [`ExtremesTracker::update`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtremesUpdate {
    pub new_max: bool,
    pub new_min: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExtremesTracker {
    seen: Option<Extremes>,
}

impl ExtremesTracker {
    pub const fn new() -> Self {
        Self { seen: None }
    }

    /// Fold one corrected reading in.  Non-finite values are ignored.
    pub fn update(&mut self, corrected_c: f32) -> ExtremesUpdate {
        if !corrected_c.is_finite() {
            return ExtremesUpdate::default();
        }
        if let Some(e) = &mut self.seen {
            let mut upd = ExtremesUpdate::default();
            if corrected_c > e.max_c {
                e.max_c = corrected_c;
                upd.new_max = true;
            }
            if corrected_c < e.min_c {
                e.min_c = corrected_c;
                upd.new_min = true;
            }
            return upd;
        }
        self.seen = Some(Extremes {
            max_c: corrected_c,
            min_c: corrected_c,
        });
        ExtremesUpdate {
            new_max: true,
            new_min: true,
        }
    }

    pub fn current(&self) -> Option<Extremes> {
        self.seen
    }
}
