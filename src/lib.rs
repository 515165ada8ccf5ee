pub mod codec;
pub mod normalizer;
pub mod resolution_tiers;

pub use codec::{efficiency_factor, scale_bitrate, VideoCodec};
pub use normalizer::{normalize, ResolutionBound};
pub use resolution_tiers::{tier_for_bitrate, ResolutionTier, RESOLUTION_TIERS};
