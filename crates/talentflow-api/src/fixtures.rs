//! Demo fixtures loaded once at process start.
//!
//! Seeds 10 jobs with stable ids, a configurable number of candidates with
//! uniformly random pipeline stages, and two literal assessments. The guard
//! is an explicit [`Seeder`] state object owned by the process; there is no
//! store-level re-seed check, so the caller is responsible for invoking
//! [`Seeder::run`] exactly once.

use rand::Rng;
use tracing::{info, warn};

use talentflow_shared::constants::SEED_JOB_COUNT;
use talentflow_shared::{Job, JobStatus, NewCandidate, Question, QuestionKind, Section, Stage};
use talentflow_store::{Database, StoreError};

/// Run-once guard plus the seeding logic.
pub struct Seeder {
    completed: bool,
}

/// What a seeding pass created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub jobs: u32,
    pub candidates: u32,
    pub assessments: u32,
}

impl Seeder {
    pub fn new() -> Self {
        Self { completed: false }
    }

    pub fn has_run(&self) -> bool {
        self.completed
    }

    /// Populate the store with the demo dataset.
    ///
    /// Returns `Ok(None)` without touching the store when this seeder has
    /// already run.
    pub fn run(
        &mut self,
        db: &mut Database,
        candidate_count: u32,
    ) -> Result<Option<SeedSummary>, StoreError> {
        if self.completed {
            warn!("fixture seeder invoked twice, ignoring");
            return Ok(None);
        }

        for i in 1..=i64::from(SEED_JOB_COUNT) {
            db.insert_job(&Job {
                id: i,
                title: format!("Job {i}"),
                slug: format!("job-{i}"),
                status: if i % 3 == 0 {
                    JobStatus::Archived
                } else {
                    JobStatus::Active
                },
                tags: vec!["remote".to_string(), "full-time".to_string()],
                order: i,
            })?;
        }

        let mut rng = rand::thread_rng();
        for i in 1..=candidate_count {
            let stage = Stage::ALL[rng.gen_range(0..Stage::ALL.len())];
            db.create_candidate(&NewCandidate {
                name: format!("Candidate {i}"),
                email: format!("candidate{i}@mail.com"),
                stage,
                job_id: None,
            })?;
        }

        db.upsert_assessment(1, &general_questions())?;
        db.upsert_assessment(2, &technical_quiz())?;

        self.completed = true;

        let summary = SeedSummary {
            jobs: SEED_JOB_COUNT,
            candidates: candidate_count,
            assessments: 2,
        };
        info!(
            jobs = summary.jobs,
            candidates = summary.candidates,
            assessments = summary.assessments,
            "seeded demo fixtures"
        );
        Ok(Some(summary))
    }
}

impl Default for Seeder {
    fn default() -> Self {
        Self::new()
    }
}

fn general_questions() -> Vec<Section> {
    vec![Section {
        title: "General Questions".to_string(),
        questions: vec![
            Question {
                id: "q1".to_string(),
                kind: QuestionKind::SingleChoice,
                text: "Do you have 3+ years of experience?".to_string(),
                options: Some(vec!["Yes".to_string(), "No".to_string()]),
                min: None,
                max: None,
                max_length: None,
                required: Some(true),
            },
            Question {
                id: "q2".to_string(),
                kind: QuestionKind::ShortText,
                text: "What is your strongest skill?".to_string(),
                options: None,
                min: None,
                max: None,
                max_length: Some(100),
                required: None,
            },
            Question {
                id: "q3".to_string(),
                kind: QuestionKind::Numeric,
                text: "Expected Salary".to_string(),
                options: None,
                min: Some(20_000.0),
                max: Some(100_000.0),
                max_length: None,
                required: None,
            },
        ],
    }]
}

fn technical_quiz() -> Vec<Section> {
    vec![Section {
        title: "Technical Quiz".to_string(),
        questions: vec![
            Question {
                id: "q1".to_string(),
                kind: QuestionKind::MultiChoice,
                text: "Which frameworks do you know?".to_string(),
                options: Some(vec![
                    "React".to_string(),
                    "Angular".to_string(),
                    "Vue".to_string(),
                ]),
                min: None,
                max: None,
                max_length: None,
                required: Some(true),
            },
            Question {
                id: "q2".to_string(),
                kind: QuestionKind::File,
                text: "Upload your resume".to_string(),
                options: None,
                min: None,
                max: None,
                max_length: None,
                required: None,
            },
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_expected_volumes() {
        let mut db = Database::open_in_memory().unwrap();
        let mut seeder = Seeder::new();

        let summary = seeder.run(&mut db, 50).unwrap().expect("first run seeds");
        assert_eq!(summary.jobs, 10);
        assert_eq!(summary.candidates, 50);

        assert_eq!(db.count_jobs().unwrap(), 10);
        assert_eq!(db.count_candidates().unwrap(), 50);
        assert!(db.get_assessment(1).unwrap().is_some());
        assert!(db.get_assessment(2).unwrap().is_some());
        assert!(db.get_assessment(3).unwrap().is_none());
    }

    #[test]
    fn every_third_job_is_archived() {
        let mut db = Database::open_in_memory().unwrap();
        Seeder::new().run(&mut db, 0).unwrap();

        assert_eq!(db.get_job(3).unwrap().status, JobStatus::Archived);
        assert_eq!(db.get_job(6).unwrap().status, JobStatus::Archived);
        assert_eq!(db.get_job(9).unwrap().status, JobStatus::Archived);
        assert_eq!(db.get_job(2).unwrap().status, JobStatus::Active);
        assert_eq!(db.get_job(10).unwrap().status, JobStatus::Active);
    }

    #[test]
    fn second_run_is_refused() {
        let mut db = Database::open_in_memory().unwrap();
        let mut seeder = Seeder::new();

        assert!(seeder.run(&mut db, 5).unwrap().is_some());
        assert!(seeder.has_run());

        assert!(seeder.run(&mut db, 5).unwrap().is_none());
        assert_eq!(db.count_candidates().unwrap(), 5);
    }

    #[test]
    fn seeded_candidates_carry_an_initial_stage_event() {
        let mut db = Database::open_in_memory().unwrap();
        Seeder::new().run(&mut db, 3).unwrap();

        for id in 1..=3 {
            let timeline = db.candidate_timeline(id).unwrap();
            assert_eq!(timeline.len(), 1);
            assert_eq!(timeline[0].stage, db.get_candidate(id).unwrap().stage);
        }
    }
}
