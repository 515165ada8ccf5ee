pub(crate) mod resolution_tier;

pub use resolution_tier::ResolutionTier;

/// Bitrate ceilings paired with the widest output they are allowed to drive.
///
/// Ascending by both fields. The lookup in [`tier_for_bitrate`] depends on that
/// ordering, so new rows must keep it.
pub static RESOLUTION_TIERS: &[ResolutionTier; 7] = &[
    ResolutionTier {
        max_width: 426,
        max_bitrate: 420_000,
    },
    ResolutionTier {
        max_width: 640,
        max_bitrate: 420_001,
    },
    ResolutionTier {
        max_width: 720,
        max_bitrate: 600_000,
    },
    ResolutionTier {
        max_width: 1280,
        max_bitrate: 750_001,
    },
    ResolutionTier {
        max_width: 1920,
        max_bitrate: 1_500_001,
    },
    ResolutionTier {
        max_width: 2560,
        max_bitrate: 3_000_001,
    },
    ResolutionTier {
        max_width: 3840,
        max_bitrate: 4_000_001,
    },
];

/// Finds the tier whose width a stream at `output_bitrate` should be held to.
///
/// The first tier whose `max_bitrate` covers the bitrate is located, then the
/// row *below* it is returned, so a budget right at a ceiling lands on the
/// smaller picture. The lowest row has nothing below it and is returned as-is.
/// Bitrates above every ceiling yield `None`.
pub fn tier_for_bitrate(output_bitrate: i64) -> Option<&'static ResolutionTier> {
    let mut previous: Option<&'static ResolutionTier> = None;

    for tier in RESOLUTION_TIERS.iter() {
        if output_bitrate <= tier.max_bitrate {
            return Some(previous.unwrap_or(tier));
        }
        previous = Some(tier);
    }

    None
}
