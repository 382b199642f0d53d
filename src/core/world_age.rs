/// World-age segmentation: pulls every dated event out of a project's
/// timelines and partitions the years into a small number of named eras.
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::schema::artifact::{Artifact, ArtifactId, ArtifactType};
use crate::schema::derived::{WorldAgeProgression, WorldAgeSegment};
use crate::schema::payload::TimelineData;

pub const DEFAULT_ERA_NAMES: &[&str] = &["Founding Age", "Expansion Era", "Flux Cycle", "Apex Horizon"];

/// Shown as the signature of an era with no events.
pub const QUIET_ERA: &str = "Quiet era";

const SIGNATURE_TITLES: usize = 3;

static YEAR_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d{1,4}").expect("year pattern is valid"));

/// Best-effort year from a free-form date.
///
/// Tried in order: a plain number (fractions truncate), an ISO-8601
/// date or date-time, then the first signed 1-4 digit integer anywhere in
/// the text.
pub fn parse_year(date: &str) -> Option<i64> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    if let Ok(value) = date.parse::<f64>() {
        if value.is_finite() {
            return Some(value.trunc() as i64);
        }
        return None;
    }
    if let Some(year) = parse_iso_year(date) {
        return Some(year);
    }
    YEAR_FRAGMENT
        .find(date)
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

fn parse_iso_year(date: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(i64::from(dt.year()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(i64::from(dt.year()));
    }
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(i64::from(d.year()));
    }
    None
}

/// A timeline event with a resolved year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedEvent {
    pub year: i64,
    pub title: String,
    pub timeline_id: ArtifactId,
    pub event_id: String,
}

/// An event whose date could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndatedEvent {
    pub timeline_id: ArtifactId,
    pub event_id: String,
    pub title: String,
    pub date: Option<String>,
}

/// Split every timeline event into dated and undated, in input order.
pub fn collect_events(artifacts: &[Artifact]) -> (Vec<DatedEvent>, Vec<UndatedEvent>) {
    let mut dated = Vec::new();
    let mut undated = Vec::new();
    for timeline in artifacts.iter().filter(|a| a.is(&ArtifactType::Timeline)) {
        let data: TimelineData = timeline.payload();
        for event in data.events {
            match event.date.as_deref().and_then(parse_year) {
                Some(year) => dated.push(DatedEvent {
                    year,
                    title: event.title,
                    timeline_id: timeline.id.clone(),
                    event_id: event.id,
                }),
                None => {
                    trace!(timeline = %timeline.id, event = %event.id, date = ?event.date, "undated event");
                    undated.push(UndatedEvent {
                        timeline_id: timeline.id.clone(),
                        event_id: event.id,
                        title: event.title,
                        date: event.date,
                    });
                }
            }
        }
    }
    (dated, undated)
}

/// Number of eras for a given year span and event count. The highest
/// satisfied threshold wins.
pub fn bucket_count(raw_span: i64, events: usize) -> usize {
    if raw_span > 400 && events >= 4 {
        4
    } else if raw_span > 150 && events >= 3 {
        3
    } else if raw_span > 0 && events >= 2 {
        2
    } else {
        1
    }
}

pub struct WorldAgeSegmenter {
    era_names: Vec<String>,
}

impl Default for WorldAgeSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_ERA_NAMES.iter().map(|s| s.to_string()).collect())
    }
}

impl WorldAgeSegmenter {
    pub fn new(era_names: Vec<String>) -> Self {
        Self { era_names }
    }

    /// Label for the era at `index`; `Age N` (1-based) past the named ones.
    pub fn era_label(&self, index: usize) -> String {
        self.era_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Age {}", index + 1))
    }

    pub fn segment(&self, artifacts: &[Artifact]) -> WorldAgeProgression {
        let (dated, undated) = collect_events(artifacts);
        let mut progression = self.segment_events(dated);
        progression.unparseable_event_count = undated.len();
        progression
    }

    pub fn segment_events(&self, mut events: Vec<DatedEvent>) -> WorldAgeProgression {
        // Stable: equal years keep timeline/list order.
        events.sort_by_key(|e| e.year);
        let (first_year, last_year) = match (events.first(), events.last()) {
            (Some(first), Some(last)) => (first.year, last.year),
            _ => return WorldAgeProgression::default(),
        };

        let raw_span = last_year - first_year;
        let span = raw_span.max(1);
        let count = bucket_count(raw_span, events.len());
        let buckets = count as i64;
        let step = ((span + buckets - 1) / buckets).max(1);

        let mut members: Vec<Vec<&DatedEvent>> = vec![Vec::new(); count];
        for event in &events {
            let slot = ((event.year - first_year) / step).min(buckets - 1);
            members[slot as usize].push(event);
        }

        let eras: Vec<WorldAgeSegment> = members
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                let start = first_year + i as i64 * step;
                let end = if i + 1 == count {
                    last_year
                } else {
                    first_year + (i as i64 + 1) * step - 1
                };
                let titles: Vec<String> = bucket.iter().map(|e| e.title.clone()).collect();
                let signature = if titles.is_empty() {
                    QUIET_ERA.to_string()
                } else {
                    titles
                        .iter()
                        .take(SIGNATURE_TITLES)
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                WorldAgeSegment {
                    label: self.era_label(i),
                    start,
                    end,
                    event_count: bucket.len(),
                    signature,
                    related_event_titles: titles,
                }
            })
            .collect();

        let current = eras.iter().rposition(|era| era.event_count > 0);
        let current_age = current.map(|i| eras[i].clone());
        let upcoming_age = current.and_then(|i| eras.get(i + 1).cloned());

        debug!(
            events = events.len(),
            eras = eras.len(),
            first_year,
            last_year,
            step,
            "world ages segmented"
        );

        WorldAgeProgression {
            current_age,
            upcoming_age,
            eras,
            last_recorded_year: Some(last_year),
            unparseable_event_count: 0,
        }
    }
}
