//! A single row of the bitrate/resolution table

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolutionTier {
    /// Widest output, in pixels, this tier allows.
    pub max_width: u32,
    /// Highest output bitrate, in bits per second, covered by this tier.
    pub max_bitrate: i64,
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>5} px  <= {} bps", self.max_width, self.max_bitrate)
    }
}
