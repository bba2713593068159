use async_trait::async_trait;
use skillspark::config::EngineConfig;
use skillspark::learning::{
    LearningEngine, LearningError, Lesson, LessonKind, Level, LoadingFlag, Notification,
    RecordingNotifier, RoadmapRequest, RoadmapSource, Skill, SqliteStateStore, Stage,
    StateStore, StaticCatalog,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Source that serves a fixed catalog
struct FixedSource(Vec<Skill>);

#[async_trait]
impl RoadmapSource for FixedSource {
    async fn fetch(&self) -> Result<Vec<Skill>, LearningError> {
        Ok(self.0.clone())
    }
}

/// Source that always fails
struct FailingSource;

#[async_trait]
impl RoadmapSource for FailingSource {
    async fn fetch(&self) -> Result<Vec<Skill>, LearningError> {
        Err(LearningError::Catalog("service unavailable".to_string()))
    }
}

/// Source that records whether the engine reported loading mid-fetch
#[derive(Default)]
struct ObservingSource {
    flag: OnceLock<LoadingFlag>,
    seen_loading: AtomicBool,
}

#[async_trait]
impl RoadmapSource for ObservingSource {
    async fn fetch(&self) -> Result<Vec<Skill>, LearningError> {
        if let Some(flag) = self.flag.get() {
            self.seen_loading.store(flag.is_loading(), Ordering::SeqCst);
        }
        Err(LearningError::Catalog("offline".to_string()))
    }
}

fn lesson(id: &str) -> Lesson {
    Lesson::new(id, id, LessonKind::Video, "English", "https://example.com")
}

fn engine_with(source: Arc<dyn RoadmapSource>) -> (LearningEngine, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = LearningEngine::new(
        EngineConfig::default(),
        source,
        Arc::new(SqliteStateStore::in_memory().unwrap()),
        notifier.clone(),
    );
    (engine, notifier)
}

fn request(skills: &[&str]) -> RoadmapRequest {
    RoadmapRequest {
        goal: "Full-stack developer".to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        level: Level::Beginner,
        language: "English".to_string(),
    }
}

fn assert_rollup_invariants(engine: &LearningEngine) {
    for skill in engine.skills() {
        assert!((0.0..=100.0).contains(&skill.progress));
        if !skill.stages.is_empty() {
            let mean = skill.stages.iter().map(|s| s.progress).sum::<f64>()
                / skill.stages.len() as f64;
            assert!((skill.progress - mean).abs() < 1e-9);
        }
        for stage in &skill.stages {
            assert!((0.0..=100.0).contains(&stage.progress));
        }
    }
}

#[tokio::test]
async fn test_single_stage_lesson_rollup() {
    let skill = Skill::new("sk", "Rust").with_stages(vec![
        Stage::new("st", 1, "Ownership").with_lessons(vec![lesson("l1"), lesson("l2")]),
    ]);
    let (mut engine, _) = engine_with(Arc::new(FixedSource(vec![skill])));
    engine.generate_roadmap(request(&["rust"])).await.unwrap();

    engine.complete_lesson("sk", "st", "l1");
    let skill = engine.skill("sk").unwrap();
    assert_eq!(skill.stages[0].progress, 50.0);
    assert_eq!(skill.progress, 50.0);

    engine.complete_lesson("sk", "st", "l2");
    let skill = engine.skill("sk").unwrap();
    assert_eq!(skill.stages[0].progress, 100.0);
    assert_eq!(skill.progress, 100.0);
    assert_rollup_invariants(&engine);
}

#[tokio::test]
async fn test_passing_first_stage_unlocks_second() {
    let (mut engine, notifier) = engine_with(Arc::new(StaticCatalog::new()));
    engine.generate_roadmap(request(&["JavaScript"])).await.unwrap();
    assert!(engine.skill("js-123").unwrap().stages[1].is_locked);

    engine.pass_quiz("js-123", "js-stage-1");

    let skill = engine.skill("js-123").unwrap();
    let (first, second) = (&skill.stages[0], &skill.stages[1]);
    assert!(first.is_completed && first.quiz_passed);
    assert_eq!(first.progress, 100.0);
    assert!(!second.is_locked);
    assert_eq!(second.progress, 0.0);
    assert_eq!(skill.progress, 50.0);
    assert_eq!(
        notifier.last(),
        Some(Notification::Success("Quiz passed! Next stage unlocked!".to_string()))
    );
    assert_rollup_invariants(&engine);
}

#[tokio::test]
async fn test_streak_counts_every_lesson_call() {
    let (mut engine, _) = engine_with(Arc::new(StaticCatalog::new()));
    engine.generate_roadmap(request(&["python"])).await.unwrap();
    assert_eq!(engine.streak(), 1);

    engine.complete_lesson("python-789", "python-stage-1", "python-lesson-1");
    let after_once = engine.skills().to_vec();
    engine.complete_lesson("python-789", "python-stage-1", "python-lesson-1");

    // Tree is unchanged by the repeat; the streak is not.
    assert_eq!(engine.skills(), after_once.as_slice());
    assert_eq!(engine.streak(), 3);

    engine.complete_lesson("unknown", "python-stage-1", "python-lesson-1");
    assert_eq!(engine.skills(), after_once.as_slice());
    assert_eq!(engine.streak(), 4);

    engine.pass_quiz("python-789", "python-stage-1");
    assert_eq!(engine.streak(), 4);
}

#[tokio::test]
async fn test_passed_stage_progress_stays_pinned() {
    let (mut engine, _) = engine_with(Arc::new(StaticCatalog::new()));
    engine.generate_roadmap(request(&["javascript"])).await.unwrap();

    engine.pass_quiz("js-123", "js-stage-1");
    engine.complete_lesson("js-123", "js-stage-1", "js-lesson-1");

    let stage = &engine.skill("js-123").unwrap().stages[0];
    assert!(stage.is_completed);
    assert_eq!(stage.progress, 100.0);
    assert_rollup_invariants(&engine);
}

#[tokio::test]
async fn test_unknown_skill_name_is_dropped() {
    let (mut engine, notifier) = engine_with(Arc::new(StaticCatalog::new()));
    engine
        .generate_roadmap(request(&["react", "haskell"]))
        .await
        .unwrap();

    let names: Vec<&str> = engine.skills().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["React"]);
    assert_eq!(engine.snapshot().selected_skills, vec!["react", "haskell"]);
    assert!(matches!(notifier.last(), Some(Notification::Success(_))));
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_tree() {
    let (mut engine, _) = engine_with(Arc::new(StaticCatalog::new()));
    engine.generate_roadmap(request(&["react"])).await.unwrap();
    engine.complete_lesson("react-456", "react-stage-1", "react-lesson-1");
    let before = engine.snapshot().clone();

    let store = Arc::new(SqliteStateStore::in_memory().unwrap());
    store
        .save("learningData", &serde_json::to_string(&before).unwrap())
        .unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let mut failing = LearningEngine::new(
        EngineConfig::default(),
        Arc::new(FailingSource),
        store,
        notifier.clone(),
    );
    failing.restore().unwrap();

    let err = failing.generate_roadmap(request(&["python"])).await.unwrap_err();
    assert!(matches!(err, LearningError::Catalog(_)));
    assert_eq!(failing.snapshot(), &before);
    assert!(!failing.is_loading());
    assert_eq!(
        notifier.last(),
        Some(Notification::Failure(
            "Failed to generate roadmap: Catalog unavailable: service unavailable".to_string()
        ))
    );
}

#[tokio::test]
async fn test_loading_flag_raised_during_fetch() {
    let source = Arc::new(ObservingSource::default());
    let (mut engine, _) = engine_with(source.clone());
    source.flag.set(engine.loading_flag()).ok();

    assert!(!engine.is_loading());
    let _ = engine.generate_roadmap(request(&["react"])).await;

    assert!(source.seen_loading.load(Ordering::SeqCst));
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn test_state_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("skillspark.db");

    {
        let mut engine = LearningEngine::new(
            EngineConfig::default(),
            Arc::new(StaticCatalog::new()),
            Arc::new(SqliteStateStore::new(Some(path.clone())).unwrap()),
            Arc::new(RecordingNotifier::new()),
        );
        engine.generate_roadmap(request(&["javascript"])).await.unwrap();
        engine.complete_lesson("js-123", "js-stage-1", "js-lesson-3");
        engine.pass_quiz("js-123", "js-stage-1");
    }

    let mut engine = LearningEngine::new(
        EngineConfig::default(),
        Arc::new(StaticCatalog::new()),
        Arc::new(SqliteStateStore::new(Some(path)).unwrap()),
        Arc::new(RecordingNotifier::new()),
    );
    assert!(engine.restore().unwrap());
    assert_eq!(engine.streak(), 2);
    let skill = engine.skill("js-123").unwrap();
    assert!(skill.stages[0].quiz_passed);
    assert!(!skill.stages[1].is_locked);
}
