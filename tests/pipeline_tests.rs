//! Tests for the trial pipeline against the reference world

use std::sync::{Arc, Mutex};

use smartcab::{
    Result,
    app::{AgentConfig, build_agent},
    pipeline::{
        CsvObserver, JsonlObserver, Observation, Observer, TrialConfig, TrialPipeline,
        compare_policies,
    },
    q_learning::{LearningAgent, PolicyMode, Scoreboard, Step, TrialStats},
    world::{World, WorldConfig},
};

fn seeded(seed: u64) -> (LearningAgent, World) {
    let agent = build_agent(&AgentConfig::default().with_seed(seed)).unwrap();
    let world = World::new(WorldConfig::default().with_seed(seed)).unwrap();
    (agent, world)
}

fn config(num_trials: usize, seed: u64) -> TrialConfig {
    TrialConfig {
        num_trials,
        seed: Some(seed),
    }
}

/// Records the event sequence as short strings.
#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }
}

impl Observer for EventLog {
    fn on_run_start(&mut self, total_trials: usize) -> Result<()> {
        self.push(format!("run:{total_trials}"));
        Ok(())
    }

    fn on_trial_start(&mut self, trial: usize) -> Result<()> {
        self.push(format!("start:{trial}"));
        Ok(())
    }

    fn on_step(&mut self, _trial: usize, _step: &Step) -> Result<()> {
        self.push("step".to_string());
        Ok(())
    }

    fn on_trial_end(&mut self, stats: &TrialStats) -> Result<()> {
        self.push(format!("end:{}", stats.trial));
        Ok(())
    }

    fn on_run_end(&mut self, scoreboard: &Scoreboard) -> Result<()> {
        self.push(format!("done:{}", scoreboard.trials_completed()));
        Ok(())
    }
}

#[test]
fn test_basic_run() {
    let (mut agent, mut world) = seeded(42);
    let summary = TrialPipeline::new(config(20, 42))
        .run(&mut agent, &mut world)
        .unwrap();

    assert_eq!(summary.trials, 20);
    assert!(summary.successes <= 20);
    assert!(summary.destinations_reached <= 20);
    assert!((0.0..=100.0).contains(&summary.success_rate));
    assert!(summary.states_seen > 0);
    assert_eq!(summary.states_seen, agent.table().len());
    assert_eq!(agent.scoreboard().trials_completed(), 20);
    assert_eq!(summary.success_rate, agent.scoreboard().cumulative_success_rate());
    // the last trial is closed, nothing is left open
    assert!(agent.current_stats().is_none());
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let (mut agent, mut world) = seeded(7);
        TrialPipeline::new(config(15, 7))
            .run(&mut agent, &mut world)
            .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_observer_event_order() {
    let log = EventLog::default();
    let (mut agent, mut world) = seeded(3);
    let summary = TrialPipeline::new(config(3, 3))
        .with_observer(Box::new(log.clone()))
        .run(&mut agent, &mut world)
        .unwrap();

    let events = log.events();
    let milestones: Vec<&str> = events
        .iter()
        .map(String::as_str)
        .filter(|e| *e != "step")
        .collect();
    assert_eq!(
        milestones,
        [
            "run:3", "start:1", "end:1", "start:2", "end:2", "start:3", "end:3", "done:3"
        ]
    );

    let steps = events.iter().filter(|e| *e == "step").count();
    let ticks: u32 = agent
        .scoreboard()
        .history()
        .iter()
        .map(|s| s.time_taken)
        .sum();
    assert_eq!(steps, ticks as usize);
    assert_eq!(summary.mean_time_taken, f64::from(ticks) / 3.0);
}

#[test]
fn test_trial_lengths_respect_limits() {
    let world_config = WorldConfig::default().with_seed(11);
    let longest_deadline = (world_config.width - 1 + world_config.height - 1)
        * world_config.deadline_factor;

    let (mut agent, _) = seeded(11);
    let mut world = World::new(world_config.clone()).unwrap();
    TrialPipeline::new(config(10, 11))
        .run(&mut agent, &mut world)
        .unwrap();
    let hard_limit = longest_deadline - world_config.hard_time_limit;
    for stats in agent.scoreboard().history() {
        assert!(stats.time_taken as i32 <= hard_limit);
    }

    let (mut agent, _) = seeded(11);
    let mut world = World::new(world_config.with_enforce_deadline(true)).unwrap();
    TrialPipeline::new(config(10, 11))
        .run(&mut agent, &mut world)
        .unwrap();
    for stats in agent.scoreboard().history() {
        assert!(stats.time_taken as i32 <= longest_deadline);
    }
}

#[test]
fn test_table_carries_over_between_runs() {
    let (mut agent, mut world) = seeded(5);
    let mut pipeline = TrialPipeline::new(config(5, 5));
    let first = pipeline.run(&mut agent, &mut world).unwrap();
    let second = pipeline.run(&mut agent, &mut world).unwrap();

    assert_eq!(first.trials, 5);
    assert_eq!(second.trials, 5);
    assert!(second.states_seen >= first.states_seen);
    assert_eq!(agent.scoreboard().trials_completed(), 10);
    assert_eq!(agent.scoreboard().history().last().map(|s| s.trial), Some(10));
}

#[test]
fn test_csv_and_jsonl_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("stats.csv");
    let jsonl_path = dir.path().join("observations.jsonl");

    let (mut agent, mut world) = seeded(9);
    let mut pipeline = TrialPipeline::new(config(4, 9))
        .with_observer(Box::new(CsvObserver::new(&csv_path).unwrap()))
        .with_observer(Box::new(JsonlObserver::new(&jsonl_path).unwrap()));
    pipeline.run(&mut agent, &mut world).unwrap();
    drop(pipeline);

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<TrialStats> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows, agent.scoreboard().history());

    let content = std::fs::read_to_string(&jsonl_path).unwrap();
    let observations: Vec<Observation> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(observations.len(), 4);
    for (i, observation) in observations.iter().enumerate() {
        assert_eq!(observation.trial, i + 1);
        assert_eq!(observation.steps.len(), observation.stats.time_taken as usize);
        let ticks: Vec<usize> = observation.steps.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, (0..observation.steps.len()).collect::<Vec<_>>());
    }
}

#[test]
fn test_compare_policies_reports_both() {
    let results = compare_policies(
        &AgentConfig::default().with_seed(21),
        &WorldConfig::default().with_seed(21),
        &config(10, 21),
    )
    .unwrap();

    let policies: Vec<PolicyMode> = results.iter().map(|r| r.policy).collect();
    assert_eq!(policies, [PolicyMode::QLearning, PolicyMode::Random]);
    for result in &results {
        assert_eq!(result.summary.trials, 10);
    }
}
