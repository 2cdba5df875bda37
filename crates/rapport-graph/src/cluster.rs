use serde::{Deserialize, Serialize};

use crate::score::{Grade, ScoredEntity};

/// Entities sharing one grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCluster {
    pub grade: Grade,
    pub color: String,
    /// Members in input order
    pub entities: Vec<ScoredEntity>,
    /// Mean score of the members, `0` when empty
    pub average_score: f64,
}

/// Entities partitioned into five fixed grade buckets, A through F
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteredView {
    pub clusters: Vec<GradeCluster>,
}

impl ClusteredView {
    /// Partitions `entities` by grade. All five buckets are always present.
    ///
    /// ```
    /// use rapport_graph::{cluster::ClusteredView, score::{EntityScore, rank_entities}};
    ///
    /// let entities = rank_entities(vec![
    ///     EntityScore { id: "a".into(), name: None, score: 85.0, grade: None },
    ///     EntityScore { id: "b".into(), name: None, score: 10.0, grade: None },
    /// ]);
    /// let view = ClusteredView::from_entities(&entities);
    /// assert_eq!(view.clusters.len(), 5);
    /// assert_eq!(view.clusters[0].entities.len(), 1);
    /// assert_eq!(view.clusters[4].entities.len(), 1);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_entities(entities: &[ScoredEntity]) -> Self {
        let clusters = Grade::ALL
            .iter()
            .map(|&grade| {
                let members = entities
                    .iter()
                    .filter(|entity| entity.grade == grade)
                    .cloned()
                    .collect::<Vec<_>>();
                let average_score = if members.is_empty() {
                    0.0
                } else {
                    members.iter().map(|entity| entity.score).sum::<f64>() / members.len() as f64
                };
                GradeCluster {
                    grade,
                    color: grade.color().to_owned(),
                    entities: members,
                    average_score,
                }
            })
            .collect();
        Self { clusters }
    }

    #[must_use]
    pub fn get(&self, grade: Grade) -> Option<&GradeCluster> {
        self.clusters.iter().find(|cluster| cluster.grade == grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{EntityScore, rank_entities};

    #[test]
    fn test_buckets_and_averages() {
        let entities = rank_entities(
            [95.0, 85.0, 65.0, 5.0]
                .iter()
                .enumerate()
                .map(|(i, &score)| EntityScore {
                    id: i.to_string(),
                    name: None,
                    score,
                    grade: None,
                })
                .collect(),
        );
        let view = ClusteredView::from_entities(&entities);
        let grades = view.clusters.iter().map(|c| c.grade).collect::<Vec<_>>();
        assert_eq!(grades, Grade::ALL);

        let a = view.get(Grade::A).unwrap();
        assert_eq!(a.entities.len(), 2);
        assert_eq!(a.average_score, 90.0);
        assert_eq!(view.get(Grade::B).unwrap().entities[0].id, "2");
        assert!(view.get(Grade::C).unwrap().entities.is_empty());
        assert_eq!(view.get(Grade::C).unwrap().average_score, 0.0);
        assert_eq!(view.get(Grade::F).unwrap().entities.len(), 1);
    }

    #[test]
    fn test_empty() {
        let view = ClusteredView::from_entities(&[]);
        assert_eq!(view.clusters.len(), 5);
        assert!(view.clusters.iter().all(|c| c.entities.is_empty()));
    }
}
