//! Progress accounting over a course index.
//!
//! `ProgressSummary` rolls the catalog up into per-status counts and credit
//! totals. The skill coverage map inverts the catalog so each skill tag lists
//! the courses that confer it, which is what a progress view renders.

use crate::catalog::{CourseId, CourseIndex, CourseStatus, SkillTag};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Course count and credit hours for one status.
pub struct StatusTally {
    pub courses: usize,
    pub credits: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Catalog-wide rollup of completion state.
pub struct ProgressSummary {
    pub completed: StatusTally,
    pub in_progress: StatusTally,
    pub planned: StatusTally,
    pub total_credits: u64,
    /// Mean `progressPercent` across in-progress courses that report one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_progress: Option<f64>,
    pub unlocked_skills: Vec<SkillTag>,
    pub skills_in_progress: Vec<SkillTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Courses conferring a single skill, bucketed by status.
pub struct SkillCoverage {
    /// True once at least one completed course confers the skill.
    pub unlocked: bool,
    pub completed: Vec<CourseId>,
    pub in_progress: Vec<CourseId>,
    pub planned: Vec<CourseId>,
}

impl ProgressSummary {
    pub fn from_index(index: &CourseIndex) -> Self {
        let mut tallies: BTreeMap<CourseStatus, StatusTally> = BTreeMap::new();
        let mut progress_sum = 0.0;
        let mut progress_count = 0usize;

        for course in index.courses() {
            let tally = tallies.entry(course.status).or_default();
            tally.courses += 1;
            tally.credits += u64::from(course.credits);

            if course.status == CourseStatus::InProgress {
                if let Some(progress) = course.progress_percent {
                    progress_sum += progress;
                    progress_count += 1;
                }
            }
        }

        let mut take = |status: CourseStatus| tallies.remove(&status).unwrap_or_default();
        let completed = take(CourseStatus::Completed);
        let in_progress = take(CourseStatus::InProgress);
        let planned = take(CourseStatus::Planned);
        let total_credits = completed.credits + in_progress.credits + planned.credits;

        Self {
            completed,
            in_progress,
            planned,
            total_credits,
            mean_progress: (progress_count > 0).then(|| progress_sum / progress_count as f64),
            unlocked_skills: index.unlocked_skills().into_iter().cloned().collect(),
            skills_in_progress: index.skills_in_progress().into_iter().cloned().collect(),
        }
    }
}

impl SkillCoverage {
    fn bucket_mut(&mut self, status: CourseStatus) -> &mut Vec<CourseId> {
        match status {
            CourseStatus::Completed => &mut self.completed,
            CourseStatus::InProgress => &mut self.in_progress,
            CourseStatus::Planned => &mut self.planned,
        }
    }
}

/// Build a mapping of skill tag to the courses that confer it.
///
/// Every tag in the catalog gets an entry. Course ids keep authored order
/// within each bucket.
pub fn build_skill_coverage_map(index: &CourseIndex) -> BTreeMap<SkillTag, SkillCoverage> {
    let mut map: BTreeMap<SkillTag, SkillCoverage> = BTreeMap::new();
    for course in index.courses() {
        for skill in &course.skills_unlocked {
            let entry = map.entry(skill.clone()).or_default();
            if course.status == CourseStatus::Completed {
                entry.unlocked = true;
            }
            let bucket = entry.bucket_mut(course.status);
            if !bucket.contains(&course.id) {
                bucket.push(course.id.clone());
            }
        }
    }
    map
}

/// Skills that some course confers but no completed course has unlocked yet.
pub fn pending_skills(coverage: &BTreeMap<SkillTag, SkillCoverage>) -> Vec<&SkillTag> {
    coverage
        .iter()
        .filter(|(_, entry)| !entry.unlocked)
        .map(|(skill, _)| skill)
        .collect()
}
