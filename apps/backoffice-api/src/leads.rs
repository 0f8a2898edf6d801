//! Lead-scoring heuristic
//!
//! Weighted arithmetic over a lead's profile, clamped to 0-100 and bucketed
//! into hot/warm/cold for the dashboard.

use serde::{Deserialize, Serialize};

/// Where the lead came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Referral,
    Website,
    WalkIn,
    Advertisement,
    Other,
}

/// Lead attributes the score is computed from
#[derive(Debug, Clone, Deserialize)]
pub struct LeadProfile {
    /// Stated budget in dollars
    pub budget: Option<f64>,
    /// Pre-qualified for financing
    #[serde(default)]
    pub prequalified: bool,
    /// Days until the lead wants to transact
    pub timeline_days: Option<i64>,
    /// Property viewings attended
    #[serde(default)]
    pub viewings: u32,
    /// Inquiries sent
    #[serde(default)]
    pub inquiries: u32,
    pub source: LeadSource,
}

/// Score bucket shown in the pipeline view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadRating {
    Hot,
    Warm,
    Cold,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadScore {
    pub score: u32,
    pub rating: LeadRating,
}

const HOT_THRESHOLD: u32 = 70;
const WARM_THRESHOLD: u32 = 40;

/// Compute the lead score.
///
/// Base of 10 points, plus budget fit, prequalification, timeline urgency,
/// engagement (viewings and inquiries, each capped), and source quality.
pub fn score_lead(profile: &LeadProfile) -> LeadScore {
    let mut score: u32 = 10;

    match profile.budget {
        Some(budget) if budget >= 500_000.0 => score += 20,
        Some(budget) if budget >= 250_000.0 => score += 10,
        Some(_) => score += 5,
        None => {}
    }

    if profile.prequalified {
        score += 25;
    }

    match profile.timeline_days {
        Some(days) if days <= 30 => score += 20,
        Some(days) if days <= 90 => score += 10,
        _ => {}
    }

    score += (profile.viewings * 5).min(15);
    score += (profile.inquiries * 2).min(10);

    score += match profile.source {
        LeadSource::Referral => 10,
        LeadSource::Website => 5,
        LeadSource::WalkIn => 5,
        LeadSource::Advertisement => 2,
        LeadSource::Other => 0,
    };

    let score = score.min(100);
    let rating = if score >= HOT_THRESHOLD {
        LeadRating::Hot
    } else if score >= WARM_THRESHOLD {
        LeadRating::Warm
    } else {
        LeadRating::Cold
    };

    LeadScore { score, rating }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cold_profile() -> LeadProfile {
        LeadProfile {
            budget: None,
            prequalified: false,
            timeline_days: None,
            viewings: 0,
            inquiries: 0,
            source: LeadSource::Other,
        }
    }

    #[test]
    fn test_minimal_profile_is_cold() {
        let result = score_lead(&cold_profile());
        assert_eq!(result.score, 10);
        assert_eq!(result.rating, LeadRating::Cold);
    }

    #[test]
    fn test_prequalified_referral_with_urgent_timeline_is_hot() {
        let profile = LeadProfile {
            budget: Some(600_000.0),
            prequalified: true,
            timeline_days: Some(14),
            viewings: 3,
            inquiries: 5,
            source: LeadSource::Referral,
        };
        let result = score_lead(&profile);
        assert_eq!(result.rating, LeadRating::Hot);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_engagement_contributions_are_capped() {
        let mut profile = cold_profile();
        profile.viewings = 100;
        profile.inquiries = 100;
        // 10 base + 15 viewings cap + 10 inquiries cap
        assert_eq!(score_lead(&profile).score, 35);
    }

    #[test]
    fn test_mid_budget_and_timeline_is_warm() {
        let profile = LeadProfile {
            budget: Some(300_000.0),
            prequalified: false,
            timeline_days: Some(60),
            viewings: 2,
            inquiries: 1,
            source: LeadSource::Website,
        };
        let result = score_lead(&profile);
        assert_eq!(result.rating, LeadRating::Warm);
    }

    proptest! {
        /// Scores are always in [0, 100]
        #[test]
        fn prop_score_is_clamped(
            budget in proptest::option::of(0.0f64..2_000_000.0),
            prequalified in any::<bool>(),
            timeline in proptest::option::of(0i64..365),
            viewings in 0u32..1000,
            inquiries in 0u32..1000,
        ) {
            let profile = LeadProfile {
                budget,
                prequalified,
                timeline_days: timeline,
                viewings,
                inquiries,
                source: LeadSource::Website,
            };
            let result = score_lead(&profile);
            prop_assert!(result.score <= 100);
        }

        /// More engagement never lowers the score
        #[test]
        fn prop_score_is_monotone_in_viewings(
            viewings in 0u32..20,
            extra in 1u32..20,
        ) {
            let mut profile = LeadProfile {
                budget: Some(400_000.0),
                prequalified: false,
                timeline_days: None,
                viewings,
                inquiries: 0,
                source: LeadSource::Website,
            };
            let base = score_lead(&profile).score;
            profile.viewings = viewings + extra;
            prop_assert!(score_lead(&profile).score >= base);
        }

        /// Rating buckets follow the fixed thresholds
        #[test]
        fn prop_rating_matches_thresholds(
            viewings in 0u32..10,
            inquiries in 0u32..10,
            prequalified in any::<bool>(),
        ) {
            let profile = LeadProfile {
                budget: Some(100_000.0),
                prequalified,
                timeline_days: Some(45),
                viewings,
                inquiries,
                source: LeadSource::Referral,
            };
            let result = score_lead(&profile);
            let expected = if result.score >= 70 {
                LeadRating::Hot
            } else if result.score >= 40 {
                LeadRating::Warm
            } else {
                LeadRating::Cold
            };
            prop_assert_eq!(result.rating, expected);
        }
    }
}
