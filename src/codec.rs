//! Codec identifiers and their relative bitrate efficiency

use std::str::FromStr;
use strum_macros::EnumString;

/// Efficiency factor of codecs that need roughly 60% of the H.264 bitrate for the same quality.
const EFFICIENT_CODEC_FACTOR: f64 = 0.6;
const BASELINE_CODEC_FACTOR: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum VideoCodec {
    #[strum(serialize = "h264")]
    H264,
    #[strum(serialize = "h265", serialize = "hevc")]
    Hevc,
    #[strum(serialize = "vp9")]
    Vp9,
    #[strum(serialize = "vp8")]
    Vp8,
    #[strum(serialize = "av1")]
    Av1,
    #[strum(serialize = "mpeg4")]
    Mpeg4,
    #[strum(serialize = "mpeg2video")]
    Mpeg2Video,
    /// Any identifier not listed above, kept verbatim.
    #[strum(default)]
    Other(String),
}

impl VideoCodec {
    /// Parses a codec identifier. Unknown names become [`VideoCodec::Other`].
    pub fn parse(name: &str) -> Self {
        VideoCodec::from_str(name).unwrap_or_else(|_| VideoCodec::Other(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            VideoCodec::H264 => "h264",
            VideoCodec::Hevc => "hevc",
            VideoCodec::Vp9 => "vp9",
            VideoCodec::Vp8 => "vp8",
            VideoCodec::Av1 => "av1",
            VideoCodec::Mpeg4 => "mpeg4",
            VideoCodec::Mpeg2Video => "mpeg2video",
            VideoCodec::Other(name) => name,
        }
    }

    /// Relative bitrate a codec needs for equivalent quality. Never zero.
    pub fn efficiency_factor(&self) -> f64 {
        match self {
            VideoCodec::Hevc | VideoCodec::Vp9 => EFFICIENT_CODEC_FACTOR,
            _ => BASELINE_CODEC_FACTOR,
        }
    }
}

impl std::fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn efficiency_factor(codec: &str) -> f64 {
    VideoCodec::parse(codec).efficiency_factor()
}

/// Converts a bitrate tuned for `input_codec` into the equivalent for `output_codec`.
///
/// Moving to a more efficient codec lowers the bitrate and moving away raises it.
/// The result is rounded to the nearest bit per second and saturates at the `i64` range.
pub fn scale_bitrate(bitrate: i64, input_codec: &str, output_codec: &str) -> i64 {
    let scale_factor = efficiency_factor(output_codec) / efficiency_factor(input_codec);
    (bitrate as f64 * scale_factor).round() as i64
}

#[cfg(test)]
mod codec_tests {
    use super::*;

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!(VideoCodec::parse("H264"), VideoCodec::H264);
        assert_eq!(VideoCodec::parse("HEVC"), VideoCodec::Hevc);
        assert_eq!(VideoCodec::parse("h265"), VideoCodec::Hevc);
        assert_eq!(VideoCodec::parse("H265"), VideoCodec::Hevc);
        assert_eq!(VideoCodec::parse("Vp9"), VideoCodec::Vp9);
        assert_eq!(VideoCodec::parse("av1"), VideoCodec::Av1);
    }

    #[test]
    fn unknown_names_are_kept_verbatim() {
        let codec = VideoCodec::parse("ProRes");
        assert_eq!(codec, VideoCodec::Other("ProRes".to_string()));
        assert_eq!(codec.to_string(), "ProRes");
        assert_eq!(codec.efficiency_factor(), 1.0);
    }

    #[test]
    fn only_hevc_and_vp9_are_discounted() {
        for name in ["h265", "hevc", "vp9", "HEVC", "VP9"] {
            assert_eq!(efficiency_factor(name), 0.6, "{name}");
        }
        for name in ["h264", "av1", "vp8", "mpeg4", "", "x265 "] {
            assert_eq!(efficiency_factor(name), 1.0, "{name}");
        }
    }

    #[test]
    fn scaling_to_efficient_codec_lowers_bitrate() {
        assert_eq!(scale_bitrate(1_000_000, "h264", "hevc"), 600_000);
        assert_eq!(scale_bitrate(1_000_000, "mpeg4", "VP9"), 600_000);
    }

    #[test]
    fn scaling_from_efficient_codec_raises_bitrate() {
        assert_eq!(scale_bitrate(1_000_000, "hevc", "h264"), 1_666_667);
        assert_eq!(scale_bitrate(3_000_000, "vp9", "av1"), 5_000_000);
    }

    #[test]
    fn same_efficiency_leaves_bitrate_alone() {
        assert_eq!(scale_bitrate(2_500_000, "h264", "h264"), 2_500_000);
        assert_eq!(scale_bitrate(2_500_000, "hevc", "vp9"), 2_500_000);
        assert_eq!(scale_bitrate(2_500_000, "unknown", "av1"), 2_500_000);
        assert_eq!(scale_bitrate(0, "h264", "hevc"), 0);
    }

    #[test]
    fn negative_bitrates_pass_through_arithmetic() {
        assert_eq!(scale_bitrate(-1_000_000, "h264", "hevc"), -600_000);
    }
}
