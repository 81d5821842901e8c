//! Scripted driver reproducing the interactive demo's control flow: ingest
//! random facts, advance time, query at random, and keep a step-tagged log.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;

use crate::memory::{ConfigError, RandomSelector, RetentionBuffer, RetentionConfig, SnapshotEntry};

pub const DEFAULT_FACTS: [&str; 6] = [
    "Project: Active",
    "IP: 10.0.0.1",
    "Env: Prod",
    "User: Admin",
    "Backup: On",
    "Rate: 100/s",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogLine {
    pub step: u64,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "> [T{}] {}", self.step, self.message)
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub buffer: RetentionConfig,
    /// Confidence given to every ingested fact
    pub ingest_confidence: f64,
    /// Logical time added by each `advance`
    pub time_step: u64,
    pub facts: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            buffer: RetentionConfig::default().with_first_id(1000),
            ingest_confidence: 0.8,
            time_step: 5,
            facts: DEFAULT_FACTS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

pub struct Simulation {
    buffer: RetentionBuffer,
    config: SimulationConfig,
    rng: StdRng,
    selector: RandomSelector,
    log: Vec<LogLine>, // Newest last
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::build(config, StdRng::from_entropy(), RandomSelector::new())
    }

    /// Deterministic run for a given seed
    pub fn seeded(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::build(
            config,
            StdRng::seed_from_u64(seed),
            RandomSelector::seeded(seed.wrapping_add(1)),
        )
    }

    fn build(config: SimulationConfig, rng: StdRng, selector: RandomSelector) -> Result<Self, ConfigError> {
        Ok(Self {
            buffer: RetentionBuffer::new(config.buffer.clone())?,
            config,
            rng,
            selector,
            log: Vec::new(),
        })
    }

    /// Ingests a random fact from the pool
    pub fn add_fact(&mut self) {
        let text = self
            .config
            .facts
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default();
        let decay_rate = self.config.buffer.decay_rate;
        let outcome = self.buffer.insert(text, self.config.ingest_confidence, decay_rate);

        if let Some(evicted) = outcome.evicted {
            self.record(
                LogLevel::Error,
                format!("Evicted ID:{} (Score:{:.2})", evicted.id, evicted.score),
            );
        }
        self.record(LogLevel::Success, format!("Ingested ID:{}", outcome.item.id()));
    }

    pub fn advance(&mut self) {
        let step = self.config.time_step;
        self.buffer.advance_clock(step, self.config.buffer.decay_rate);
        self.record(LogLevel::Info, format!("Time advanced +{step}"));
    }

    /// Queries a random item; silent on an empty buffer
    pub fn query(&mut self) {
        if let Some(item) = self.buffer.query(&mut self.selector) {
            self.record(
                LogLevel::Success,
                format!("Queried ID:{}. Utility boosted.", item.id()),
            );
        }
    }

    /// Ingest followed by a conflict warning
    pub fn conflict(&mut self) {
        self.add_fact();
        self.record(LogLevel::Warn, "CONFLICT DETECTED".to_string());
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Log lines, newest first
    pub fn log(&self) -> impl Iterator<Item = &LogLine> {
        self.log.iter().rev()
    }

    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.buffer.snapshot()
    }

    pub fn buffer(&self) -> &RetentionBuffer {
        &self.buffer
    }

    fn record(&mut self, level: LogLevel, message: String) {
        let step = self.buffer.clock();
        match level {
            LogLevel::Error | LogLevel::Warn => tracing::warn!(step, "{message}"),
            LogLevel::Success | LogLevel::Info => tracing::info!(step, "{message}"),
        }
        self.log.push(LogLine { step, level, message });
    }
}
