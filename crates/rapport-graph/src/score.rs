//! Scored entities, letter grades and ranking
//!
//! Relationship scores come from an external scorer on a 0-100 scale. This
//! module grades and ranks them so the graph builder can consume a sorted list.

use serde::{Deserialize, Serialize};

/// Coarse letter bucket of a relationship score
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Grade of a 0-100 score.
    ///
    /// ```
    /// # use rapport_graph::score::Grade;
    /// assert_eq!(Grade::from_score(80.0), Grade::A);
    /// assert_eq!(Grade::from_score(79.9), Grade::B);
    /// assert_eq!(Grade::from_score(19.0), Grade::F);
    /// ```
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => Grade::A,
            s if s >= 60.0 => Grade::B,
            s if s >= 40.0 => Grade::C,
            s if s >= 20.0 => Grade::D,
            _ => Grade::F,
        }
    }

    /// Display color of nodes with this grade.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Grade::A => "#22c55e",
            Grade::B => "#3b82f6",
            Grade::C => "#eab308",
            Grade::D => "#f97316",
            Grade::F => "#ef4444",
        }
    }
}

/// Raw scorer output for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityScore {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub score: f64,
    /// Grade assigned by the scorer; derived from `score` when absent
    #[serde(default)]
    pub grade: Option<Grade>,
}

/// A graded entity with its 1-based rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub score: f64,
    pub grade: Grade,
    pub rank: usize,
}

impl ScoredEntity {
    /// Display label, falling back to a synthetic one when the name is missing.
    #[must_use]
    pub fn label(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_owned(),
            _ => format!("Contact {}", self.id),
        }
    }
}

/// Sorts scores descending and assigns ranks.
///
/// The sort is stable: equal scores keep their input order. Non-finite scores are
/// treated as `0` and scores are clamped into `[0, 100]`.
///
/// # Examples
///
/// ```
/// use rapport_graph::score::{EntityScore, Grade, rank_entities};
///
/// let ranked = rank_entities(vec![
///     EntityScore { id: "a".into(), name: None, score: 40.0, grade: None },
///     EntityScore { id: "b".into(), name: None, score: 90.0, grade: None },
/// ]);
/// assert_eq!(ranked[0].id, "b");
/// assert_eq!(ranked[0].rank, 1);
/// assert_eq!(ranked[0].grade, Grade::A);
/// assert_eq!(ranked[1].grade, Grade::C);
/// ```
#[must_use]
pub fn rank_entities(scores: Vec<EntityScore>) -> Vec<ScoredEntity> {
    let mut scores = scores
        .into_iter()
        .map(|mut entity| {
            entity.score = if entity.score.is_finite() {
                entity.score.clamp(0.0, 100.0)
            } else {
                0.0
            };
            entity
        })
        .collect::<Vec<_>>();
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));

    scores
        .into_iter()
        .enumerate()
        .map(|(idx, entity)| ScoredEntity {
            grade: entity
                .grade
                .unwrap_or_else(|| Grade::from_score(entity.score)),
            id: entity.id,
            name: entity.name,
            score: entity.score,
            rank: idx + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(id: &str, score: f64) -> EntityScore {
        EntityScore {
            id: id.to_owned(),
            name: None,
            score,
            grade: None,
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank_entities(vec![
            score("first", 50.0),
            score("top", 70.0),
            score("second", 50.0),
            score("third", 50.0),
        ]);
        let ids = ranked.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["top", "first", "second", "third"]);
        let ranks = ranked.iter().map(|e| e.rank).collect::<Vec<_>>();
        assert_eq!(ranks, [1, 2, 3, 4]);
    }

    #[test]
    fn test_scorer_grade_is_kept() {
        let mut entity = score("a", 95.0);
        entity.grade = Some(Grade::C);
        let ranked = rank_entities(vec![entity]);
        assert_eq!(ranked[0].grade, Grade::C);
    }

    #[test]
    fn test_scores_are_sanitized() {
        let ranked = rank_entities(vec![score("nan", f64::NAN), score("big", 250.0)]);
        assert_eq!(ranked[0].id, "big");
        assert_eq!(ranked[0].score, 100.0);
        assert_eq!(ranked[1].score, 0.0);
        assert_eq!(ranked[1].grade, Grade::F);
    }

    #[test]
    fn test_grade_boundaries() {
        let grades = [100.0, 80.0, 60.0, 40.0, 20.0, 0.0].map(Grade::from_score);
        assert_eq!(
            grades,
            [Grade::A, Grade::A, Grade::B, Grade::C, Grade::D, Grade::F]
        );
    }

    #[test]
    fn test_label_fallback() {
        let mut entity = rank_entities(vec![score("42", 10.0)]).remove(0);
        assert_eq!(entity.label(), "Contact 42");
        entity.name = Some("  ".to_owned());
        assert_eq!(entity.label(), "Contact 42");
        entity.name = Some("Kim".to_owned());
        assert_eq!(entity.label(), "Kim");
    }
}
