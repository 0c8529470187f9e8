//! Emission factors and conversion constants.
//!
//! Every value here is expressed in grams of CO₂. Streaming, social media and
//! video call rates are derived as `grams per GB × GB per hour`, which is why
//! they are written as products below.

use crate::model::VideoQuality;

/// Share of daily email assumed to carry no attachment.
pub const EMAIL_REGULAR_SHARE: f64 = 0.7;

/// Share of daily email assumed to carry an attachment.
pub const EMAIL_ATTACHMENT_SHARE: f64 = 0.3;

/// Kilometres driven per gram of CO₂.
pub const DRIVING_KM_PER_GRAM: f64 = 0.12;

/// Trees needed for one day to absorb one gram of CO₂.
pub const TREE_DAYS_PER_GRAM: f64 = 0.0055;

/// Hours a 10W LED bulb runs per gram of CO₂.
pub const LIGHTBULB_HOURS_PER_GRAM: f64 = 0.1;

/// Per-tier streaming rates in grams per hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamingFactors {
    pub sd: f64,
    pub hd: f64,
    pub uhd_4k: f64,
}

/// Per-message email emissions in grams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmailFactors {
    pub regular: f64,
    pub with_attachment: f64,
}

/// Emission factors used by the footprint estimator.
///
/// The estimator owns a copy of this value; there is no way to change the
/// factors of an estimator once it has been built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionFactors {
    /// Streaming rate per video quality tier (g/hour).
    pub streaming: StreamingFactors,

    /// Social media browsing (g/hour).
    pub social_media: f64,

    /// Email sending/receiving (g/message).
    pub email: EmailFactors,

    /// Cloud storage (g per GB per day).
    pub cloud_storage: f64,

    /// Video calls (g/hour).
    pub video_call: f64,
}

impl EmissionFactors {
    /// The reference factor set.
    pub const STANDARD: Self = Self {
        streaming: StreamingFactors {
            // 1 g/GB at 8 GB/hour
            sd: 1.0 * 8.0,
            // 3 g/GB at 12 GB/hour
            hd: 3.0 * 12.0,
            // 7 g/GB at 14 GB/hour
            uhd_4k: 7.0 * 14.0,
        },
        // 0.5 g/GB at 1.5 GB/hour
        social_media: 0.5 * 1.5,
        email: EmailFactors {
            regular: 0.2,
            with_attachment: 0.5,
        },
        cloud_storage: 0.1,
        // 2.5 g/GB at 2 GB/hour
        video_call: 2.5 * 2.0,
    };

    /// Streaming rate (g/hour) for a quality tier.
    pub fn streaming_rate(&self, quality: VideoQuality) -> f64 {
        match quality {
            VideoQuality::Sd => self.streaming.sd,
            VideoQuality::Hd => self.streaming.hd,
            VideoQuality::Uhd4k => self.streaming.uhd_4k,
        }
    }
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_streaming_rates() {
        let factors = EmissionFactors::STANDARD;
        assert_eq!(factors.streaming_rate(VideoQuality::Sd), 8.0);
        assert_eq!(factors.streaming_rate(VideoQuality::Hd), 36.0);
        assert_eq!(factors.streaming_rate(VideoQuality::Uhd4k), 98.0);
    }

    #[test]
    fn test_standard_flat_rates() {
        let factors = EmissionFactors::default();
        assert_eq!(factors.social_media, 0.75);
        assert_eq!(factors.email.regular, 0.2);
        assert_eq!(factors.email.with_attachment, 0.5);
        assert_eq!(factors.cloud_storage, 0.1);
        assert_eq!(factors.video_call, 5.0);
    }

    #[test]
    fn test_email_split_is_complete() {
        assert!((EMAIL_REGULAR_SHARE + EMAIL_ATTACHMENT_SHARE - 1.0).abs() < f64::EPSILON);
    }
}
