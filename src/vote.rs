//! Combining several `(positive, negative)` results into one decision.
//!
//! `shift` is subtracted from every negative score before comparing and
//! `threshold` is the margin a side needs to win. An empty result list is
//! always [`Verdict::Neutral`] with zero scores.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Positive,
    Negative,
    Neutral,
}

impl Verdict {
    /// Strict comparison; ties are neutral.
    pub fn from_scores(positive: f64, negative: f64) -> Self {
        if positive > negative {
            Verdict::Positive
        } else if negative > positive {
            Verdict::Negative
        } else {
            Verdict::Neutral
        }
    }

    /// `(1, 0)`, `(0, 1)` or `(0, 0)`.
    pub fn flags(self) -> (u8, u8) {
        match self {
            Verdict::Positive => (1, 0),
            Verdict::Negative => (0, 1),
            Verdict::Neutral => (0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vote {
    pub verdict: Verdict,
    pub pos_score: f64,
    pub neg_score: f64,
}

impl Vote {
    fn empty() -> Self {
        Self {
            verdict: Verdict::Neutral,
            pos_score: 0.0,
            neg_score: 0.0,
        }
    }
}

/// One vote per result; scores are the vote fractions.
pub fn majority_vote(results: &[(f64, f64)], shift: f64, threshold: f64) -> Vote {
    if results.is_empty() {
        return Vote::empty();
    }
    let (mut pos_votes, mut neg_votes) = (0usize, 0usize);
    for &(pos, neg) in results {
        if (neg - shift) - pos > threshold {
            neg_votes += 1;
        } else if pos - (neg - shift) >= threshold {
            pos_votes += 1;
        }
    }
    let n = results.len() as f64;
    Vote {
        verdict: Verdict::from_scores(pos_votes as f64, neg_votes as f64),
        pos_score: pos_votes as f64 / n,
        neg_score: neg_votes as f64 / n,
    }
}

/// Decision on the summed scores; reported scores are the averages.
pub fn sum_vote(results: &[(f64, f64)], shift: f64, threshold: f64) -> Vote {
    if results.is_empty() {
        return Vote::empty();
    }
    let (pos, neg) = results
        .iter()
        .fold((0.0, 0.0), |(p, n), &(rp, rn)| (p + rp, n + rn));
    let n = results.len() as f64;
    Vote {
        verdict: binary(pos, neg, shift, threshold),
        pos_score: pos / n,
        neg_score: neg / n,
    }
}

/// Decision on the per-side maxima.
pub fn max_vote(results: &[(f64, f64)], shift: f64, threshold: f64) -> Vote {
    if results.is_empty() {
        return Vote::empty();
    }
    let (pos, neg) = results.iter().fold(
        (f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(p, n), &(rp, rn)| (p.max(rp), n.max(rn)),
    );
    Vote {
        verdict: binary(pos, neg, shift, threshold),
        pos_score: pos,
        neg_score: neg,
    }
}

fn binary(pos: f64, neg: f64, shift: f64, threshold: f64) -> Verdict {
    if pos - (neg - shift) >= threshold {
        Verdict::Positive
    } else {
        Verdict::Negative
    }
}
