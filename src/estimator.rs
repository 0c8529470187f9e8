//! Footprint estimation, equivalents and suggestions.
//!
//! Everything in this module is a pure function of its input and the
//! estimator's [`EmissionFactors`]. There is no caching and no shared state,
//! so an estimator can be used from any number of tasks at once.

use crate::factors::{
    DRIVING_KM_PER_GRAM, EMAIL_ATTACHMENT_SHARE, EMAIL_REGULAR_SHARE, EmissionFactors,
    LIGHTBULB_HOURS_PER_GRAM, TREE_DAYS_PER_GRAM,
};
use crate::model::{ActivityRecord, Equivalents, EstimationResult, Suggestion, VideoQuality};

/// Maximum number of suggestions returned for one record.
pub const MAX_SUGGESTIONS: usize = 3;

const LOWER_STREAMING_QUALITY: Suggestion = Suggestion {
    title: "Lower streaming quality",
    description: "Switch from 4K to HD when the highest resolution isn't needed",
    impact_percent: 60,
};

const CONSIDER_SD: Suggestion = Suggestion {
    title: "Consider SD for some content",
    description: "For some shows, or when you're on mobile, SD quality is good enough",
    impact_percent: 40,
};

const REDUCE_STREAMING_TIME: Suggestion = Suggestion {
    title: "Reduce streaming time",
    description: "Try to limit streaming to 2 hours a day",
    impact_percent: 30,
};

const CLEAN_INBOX: Suggestion = Suggestion {
    title: "Clean your inbox",
    description: "Unsubscribe from newsletters you don't read and cut down on unnecessary email",
    impact_percent: 15,
};

const OPTIMIZE_CLOUD_STORAGE: Suggestion = Suggestion {
    title: "Optimize cloud storage",
    description: "Delete unused files and compress large files before uploading them",
    impact_percent: 20,
};

const VIDEO_OFF: Suggestion = Suggestion {
    title: "Turn off video when unnecessary",
    description: "Use audio-only mode for parts of calls where video isn't needed",
    impact_percent: 50,
};

const REDUCE_SOCIAL_MEDIA: Suggestion = Suggestion {
    title: "Reduce social media scrolling",
    description: "Set a time limit on social media apps to reduce data usage",
    impact_percent: 25,
};

/// Generic tips appended, in this order, when the rules produce fewer than
/// [`MAX_SUGGESTIONS`] entries.
const GENERIC_SUGGESTIONS: [Suggestion; 2] = [
    Suggestion {
        title: "Download instead of streaming repeatedly",
        description: "For content you watch again and again, download it once instead of streaming it every time",
        impact_percent: 35,
    },
    Suggestion {
        title: "Use dark mode",
        description: "Dark mode saves battery on OLED screens, lowering energy use",
        impact_percent: 10,
    },
];

/// Converts activity records into footprints, equivalents and suggestions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FootprintEstimator {
    factors: EmissionFactors,
}

impl FootprintEstimator {
    /// Create an estimator with a fixed set of emission factors.
    pub const fn new(factors: EmissionFactors) -> Self {
        Self { factors }
    }

    /// The factors this estimator was built with.
    pub fn factors(&self) -> &EmissionFactors {
        &self.factors
    }

    /// Estimate the daily footprint in grams of CO₂, rounded to 0.1 g.
    ///
    /// Rounding uses [`f64::round`], so exact halves round away from zero.
    /// Inputs are not range-checked: negative or huge values simply flow
    /// through the arithmetic.
    pub fn estimate_footprint(&self, activity: &ActivityRecord) -> f64 {
        let factors = &self.factors;

        let streaming = activity.streaming_hours * factors.streaming_rate(activity.video_quality);
        let social_media = activity.social_media_hours * factors.social_media;
        let email = activity.emails_per_day * EMAIL_REGULAR_SHARE * factors.email.regular
            + activity.emails_per_day * EMAIL_ATTACHMENT_SHARE * factors.email.with_attachment;
        let cloud_storage = activity.cloud_storage_gb * factors.cloud_storage;
        let video_calls = activity.video_calls_hours * factors.video_call;

        let total = streaming + social_media + email + cloud_storage + video_calls;

        (total * 10.0).round() / 10.0
    }

    /// Translate a footprint into driving distance, tree-days and bulb-hours.
    ///
    /// No rounding is applied.
    pub fn get_equivalents(&self, carbon_grams: f64) -> Equivalents {
        Equivalents {
            driving_km: carbon_grams * DRIVING_KM_PER_GRAM,
            tree_days: carbon_grams * TREE_DAYS_PER_GRAM,
            lightbulb_hours: carbon_grams * LIGHTBULB_HOURS_PER_GRAM,
        }
    }

    /// Up to three improvement suggestions, in rule order.
    ///
    /// When the rules produce fewer than three entries, both generic tips are
    /// appended even if they repeat advice already given, and the list is then
    /// cut to the first three. The result is never sorted by impact.
    pub fn get_suggestions(&self, activity: &ActivityRecord) -> Vec<Suggestion> {
        let mut suggestions = Vec::with_capacity(MAX_SUGGESTIONS + GENERIC_SUGGESTIONS.len());

        match activity.video_quality {
            VideoQuality::Uhd4k if activity.streaming_hours > 1.0 => {
                suggestions.push(LOWER_STREAMING_QUALITY)
            }
            VideoQuality::Hd if activity.streaming_hours > 2.0 => suggestions.push(CONSIDER_SD),
            _ => {}
        }

        if activity.streaming_hours > 3.0 {
            suggestions.push(REDUCE_STREAMING_TIME);
        }

        if activity.emails_per_day > 20.0 {
            suggestions.push(CLEAN_INBOX);
        }

        if activity.cloud_storage_gb > 10.0 {
            suggestions.push(OPTIMIZE_CLOUD_STORAGE);
        }

        if activity.video_calls_hours > 2.0 {
            suggestions.push(VIDEO_OFF);
        }

        if activity.social_media_hours > 2.0 {
            suggestions.push(REDUCE_SOCIAL_MEDIA);
        }

        if suggestions.len() < MAX_SUGGESTIONS {
            suggestions.extend(GENERIC_SUGGESTIONS);
        }

        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }

    /// Footprint, its equivalents and the suggestions for one record.
    pub fn estimate(&self, activity: &ActivityRecord) -> EstimationResult {
        let carbon_footprint_grams = self.estimate_footprint(activity);

        EstimationResult {
            carbon_footprint_grams,
            equivalents: self.get_equivalents(carbon_footprint_grams),
            suggestions: self.get_suggestions(activity),
        }
    }
}

const STANDARD_ESTIMATOR: FootprintEstimator = FootprintEstimator::new(EmissionFactors::STANDARD);

/// [`FootprintEstimator::estimate_footprint`] with the standard factors.
pub fn estimate_footprint(activity: &ActivityRecord) -> f64 {
    STANDARD_ESTIMATOR.estimate_footprint(activity)
}

/// [`FootprintEstimator::get_equivalents`] with the standard factors.
pub fn get_equivalents(carbon_grams: f64) -> Equivalents {
    STANDARD_ESTIMATOR.get_equivalents(carbon_grams)
}

/// [`FootprintEstimator::get_suggestions`] with the standard factors.
pub fn get_suggestions(activity: &ActivityRecord) -> Vec<Suggestion> {
    STANDARD_ESTIMATOR.get_suggestions(activity)
}

/// [`FootprintEstimator::estimate`] with the standard factors.
pub fn estimate(activity: &ActivityRecord) -> EstimationResult {
    STANDARD_ESTIMATOR.estimate(activity)
}
