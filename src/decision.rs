use std::fmt;

use serde::{Deserialize, Serialize};

/// Approval score at or above which an application still needs review.
pub const REVIEW_THRESHOLD: f64 = 35.;
/// Approval score at or above which an application is approved.
pub const APPROVAL_THRESHOLD: f64 = 70.;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Rejected,
    RequiresReview,
    Approved,
}

impl Decision {
    /// Lower bounds are inclusive: 35 is a review, 70 an approval.
    pub fn from_score(score: f64) -> Self {
        if score >= APPROVAL_THRESHOLD {
            Self::Approved
        } else if score >= REVIEW_THRESHOLD {
            Self::RequiresReview
        } else {
            Self::Rejected
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rejected => "REJECTED",
            Self::RequiresReview => "REQUIRES_REVIEW",
            Self::Approved => "APPROVED",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[test]
fn test_thresholds() {
    assert_eq!(Decision::from_score(0.), Decision::Rejected);
    assert_eq!(Decision::from_score(34.99), Decision::Rejected);
    assert_eq!(Decision::from_score(35.), Decision::RequiresReview);
    assert_eq!(Decision::from_score(69.99), Decision::RequiresReview);
    assert_eq!(Decision::from_score(70.), Decision::Approved);
    assert_eq!(Decision::from_score(100.), Decision::Approved);
}

#[test]
fn test_serialized_names() {
    assert_eq!(
        serde_json::to_string(&Decision::RequiresReview).unwrap(),
        "\"REQUIRES_REVIEW\""
    );
    assert_eq!(Decision::Approved.to_string(), "APPROVED");
    assert_eq!(
        serde_json::from_str::<Decision>("\"REJECTED\"").unwrap(),
        Decision::Rejected
    );
}
