//! Score history per entity
//!
//! Snapshots recorded by the scorer over time are grouped into one series per
//! entity and summarized as a trend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score changes within this margin count as [`Trend::Stable`].
pub const TREND_THRESHOLD: f64 = 5.0;

/// One recorded score of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub entity_id: String,
    pub recorded_at: DateTime<Utc>,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub recorded_at: DateTime<Utc>,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    #[display("rising")]
    Rising,
    #[display("stable")]
    Stable,
    #[display("falling")]
    Falling,
}

impl Trend {
    /// Classifies a score change.
    ///
    /// ```
    /// # use rapport_graph::timeline::Trend;
    /// assert_eq!(Trend::from_change(5.5), Trend::Rising);
    /// assert_eq!(Trend::from_change(5.0), Trend::Stable);
    /// assert_eq!(Trend::from_change(-7.0), Trend::Falling);
    /// ```
    #[must_use]
    pub fn from_change(change: f64) -> Self {
        if change > TREND_THRESHOLD {
            Trend::Rising
        } else if change < -TREND_THRESHOLD {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }
}

/// Time-ordered score series of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTimeline {
    pub entity_id: String,
    pub points: Vec<TimelinePoint>,
    pub first_score: f64,
    pub latest_score: f64,
    /// `latest_score - first_score`
    pub change: f64,
    pub trend: Trend,
}

impl EntityTimeline {
    fn from_points(entity_id: String, mut points: Vec<TimelinePoint>) -> Option<Self> {
        points.sort_by_key(|point| point.recorded_at);
        let first_score = points.first()?.score;
        let latest_score = points.last()?.score;
        let change = latest_score - first_score;
        Some(Self {
            entity_id,
            points,
            first_score,
            latest_score,
            change,
            trend: Trend::from_change(change),
        })
    }
}

/// Score series of all entities, ordered by entity id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub entities: Vec<EntityTimeline>,
}

impl Timeline {
    /// Groups snapshots by entity. Snapshots with equal timestamps keep their
    /// input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use rapport_graph::timeline::{ScoreSnapshot, Timeline, Trend};
    ///
    /// let at = |day| Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap();
    /// let timeline = Timeline::from_snapshots(vec![
    ///     ScoreSnapshot { entity_id: "kim".into(), recorded_at: at(10), score: 70.0 },
    ///     ScoreSnapshot { entity_id: "kim".into(), recorded_at: at(1), score: 40.0 },
    /// ]);
    /// assert_eq!(timeline.entities[0].first_score, 40.0);
    /// assert_eq!(timeline.entities[0].trend, Trend::Rising);
    /// ```
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ScoreSnapshot>) -> Self {
        let mut series = BTreeMap::<String, Vec<TimelinePoint>>::new();
        for snapshot in snapshots {
            series
                .entry(snapshot.entity_id)
                .or_default()
                .push(TimelinePoint {
                    recorded_at: snapshot.recorded_at,
                    score: snapshot.score,
                });
        }

        let entities = series
            .into_iter()
            .filter_map(|(entity_id, points)| EntityTimeline::from_points(entity_id, points))
            .collect::<Vec<_>>();
        tracing::debug!(entities = entities.len(), "timeline built");
        Self { entities }
    }

    #[must_use]
    pub fn get(&self, entity_id: &str) -> Option<&EntityTimeline> {
        self.entities
            .iter()
            .find(|timeline| timeline.entity_id == entity_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn snapshot(id: &str, day: u32, score: f64) -> ScoreSnapshot {
        ScoreSnapshot {
            entity_id: id.to_owned(),
            recorded_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            score,
        }
    }

    #[test]
    fn test_groups_and_orders() {
        let timeline = Timeline::from_snapshots(vec![
            snapshot("b", 3, 50.0),
            snapshot("a", 5, 20.0),
            snapshot("b", 1, 60.0),
            snapshot("a", 2, 30.0),
        ]);
        let ids = timeline
            .entities
            .iter()
            .map(|e| e.entity_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b"]);

        let a = timeline.get("a").unwrap();
        let scores = a.points.iter().map(|p| p.score).collect::<Vec<_>>();
        assert_eq!(scores, [30.0, 20.0]);
        assert_eq!(a.change, -10.0);
        assert_eq!(a.trend, Trend::Falling);

        let b = timeline.get("b").unwrap();
        assert_eq!(b.first_score, 60.0);
        assert_eq!(b.latest_score, 50.0);
        assert_eq!(b.trend, Trend::Falling);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let timeline = Timeline::from_snapshots(vec![
            snapshot("a", 4, 10.0),
            snapshot("a", 4, 12.0),
            snapshot("a", 4, 11.0),
        ]);
        let a = timeline.get("a").unwrap();
        let scores = a.points.iter().map(|p| p.score).collect::<Vec<_>>();
        assert_eq!(scores, [10.0, 12.0, 11.0]);
        assert_eq!(a.trend, Trend::Stable);
    }

    #[test]
    fn test_single_point_is_stable() {
        let timeline = Timeline::from_snapshots(vec![snapshot("solo", 9, 88.0)]);
        let solo = timeline.get("solo").unwrap();
        assert_eq!(solo.change, 0.0);
        assert_eq!(solo.trend, Trend::Stable);
        assert!(Timeline::from_snapshots(vec![]).entities.is_empty());
    }

    #[test]
    fn test_snapshot_json() {
        let json = r#"[{"entity_id":"x","recorded_at":"2024-01-02T00:00:00Z","score":42.5}]"#;
        let snapshots: Vec<ScoreSnapshot> = serde_json::from_str(json).unwrap();
        let timeline = Timeline::from_snapshots(snapshots);
        assert_eq!(timeline.entities[0].latest_score, 42.5);
    }
}
