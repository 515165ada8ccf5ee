//! Bitrate-driven resolution bounds

use crate::resolution_tiers::tier_for_bitrate;
use serde::Serialize;

/// Upper bound an encoder's output must respect. `None` leaves that dimension unbounded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionBound {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl ResolutionBound {
    pub fn new(max_width: Option<u32>, max_height: Option<u32>) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_width.is_none() && self.max_height.is_none()
    }
}

impl std::fmt::Display for ResolutionBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let describe = |value: Option<u32>| match value {
            Some(px) => px.to_string(),
            None => "unbounded".to_string(),
        };
        write!(
            f,
            "max_width={} max_height={}",
            describe(self.max_width),
            describe(self.max_height)
        )
    }
}

/// Tightens a caller's resolution ceiling to what `output_bitrate` can sustain.
///
/// When the stream is not losing bitrate (`output_bitrate >= input_bitrate`) and
/// the caller already set a ceiling, that ceiling is returned untouched. Otherwise
/// the width is clamped to the tier chosen by [`tier_for_bitrate`]. A height is
/// only kept when the caller's width survived clamping unchanged, since a height
/// paired with some other width would skew the picture.
pub fn normalize(
    input_bitrate: Option<i64>,
    output_bitrate: i64,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> ResolutionBound {
    let caller_bound = ResolutionBound::new(max_width, max_height);

    if input_bitrate.is_some_and(|input| output_bitrate >= input) && !caller_bound.is_unbounded() {
        return caller_bound;
    }

    let Some(tier) = tier_for_bitrate(output_bitrate) else {
        return caller_bound;
    };

    let width = tier.max_width.min(max_width.unwrap_or(tier.max_width));
    let height = if max_width == Some(width) {
        max_height
    } else {
        None
    };

    ResolutionBound::new(Some(width), height)
}

#[cfg(test)]
mod normalizer_tests {
    use super::*;

    #[test]
    fn keeps_caller_bound_when_bitrate_is_not_reduced() {
        let bound = normalize(Some(1_000_000), 1_500_000, Some(1280), Some(720));
        assert_eq!(bound, ResolutionBound::new(Some(1280), Some(720)));
    }

    #[test]
    fn equal_bitrates_count_as_not_reduced() {
        let bound = normalize(Some(300_000), 300_000, None, Some(1080));
        assert_eq!(bound, ResolutionBound::new(None, Some(1080)));
    }

    #[test]
    fn unreduced_bitrate_without_caller_bound_still_uses_table() {
        let bound = normalize(Some(400_000), 500_000, None, None);
        assert_eq!(bound, ResolutionBound::new(Some(640), None));
    }

    #[test]
    fn unknown_input_bitrate_never_short_circuits() {
        let bound = normalize(None, 1_000_000, Some(1920), Some(1080));
        assert_eq!(bound, ResolutionBound::new(Some(1280), None));
    }

    #[test]
    fn derived_width_discards_caller_height() {
        let bound = normalize(None, 500_000, None, Some(480));
        assert_eq!(bound, ResolutionBound::new(Some(640), None));
    }

    #[test]
    fn unchanged_caller_width_preserves_height() {
        let bound = normalize(None, 300_000, Some(426), Some(240));
        assert_eq!(bound, ResolutionBound::new(Some(426), Some(240)));
    }

    #[test]
    fn narrower_caller_width_wins_and_keeps_height() {
        let bound = normalize(Some(8_000_000), 2_000_000, Some(1280), Some(720));
        assert_eq!(bound, ResolutionBound::new(Some(1280), Some(720)));
    }

    #[test]
    fn bitrate_above_table_returns_caller_bound() {
        let bound = normalize(Some(10_000_000), 5_000_000, Some(1920), Some(1080));
        assert_eq!(bound, ResolutionBound::new(Some(1920), Some(1080)));

        let open = normalize(None, 5_000_000, None, None);
        assert!(open.is_unbounded());
    }

    #[test]
    fn repeated_calls_agree() {
        let first = normalize(Some(2_000_000), 600_000, Some(1920), Some(1080));
        let second = normalize(Some(2_000_000), 600_000, Some(1920), Some(1080));
        assert_eq!(first, second);
        assert_eq!(first, ResolutionBound::new(Some(640), None));
    }

    #[test]
    fn display_marks_missing_dimensions() {
        let bound = ResolutionBound::new(Some(640), None);
        assert_eq!(bound.to_string(), "max_width=640 max_height=unbounded");
    }
}
