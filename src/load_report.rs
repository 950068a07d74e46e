use tracing::info;

use crate::rules::RuleUpsert;
use crate::rules_repo::LinkStats;

/// Counters for one loader stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderMetrics {
    pub name: String,
    pub duration_secs: f64,
    pub rows_read: usize,
    pub rules_inserted: usize,
    pub rules_existing: usize,
    pub rows_skipped: usize,
    pub links_created: usize,
    pub conditions_dropped: usize,
    /// Every source file of the stage was missing or empty.
    pub source_missing: bool,
}

impl LoaderMetrics {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            duration_secs: 0.0,
            rows_read: 0,
            rules_inserted: 0,
            rules_existing: 0,
            rows_skipped: 0,
            links_created: 0,
            conditions_dropped: 0,
            source_missing: false,
        }
    }

    pub fn record_upsert(&mut self, upsert: RuleUpsert) {
        match upsert {
            RuleUpsert::Inserted(_) => self.rules_inserted += 1,
            RuleUpsert::Existing(_) => self.rules_existing += 1,
        }
    }

    pub fn record_links(&mut self, stats: LinkStats) {
        self.links_created += stats.linked;
        self.conditions_dropped += stats.dropped;
    }

    pub fn record_skip(&mut self) {
        self.rows_skipped += 1;
    }

    pub fn rules_total(&self) -> usize {
        self.rules_inserted + self.rules_existing
    }
}

/// Summary of a whole compiler run.
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    pub total_duration_secs: f64,
    pub stages: Vec<LoaderMetrics>,
}

impl CompileReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stage(&mut self, metrics: LoaderMetrics) {
        self.stages.push(metrics);
    }

    pub fn stage(&self, name: &str) -> Option<&LoaderMetrics> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    pub fn rules_inserted(&self) -> usize {
        self.stages.iter().map(|stage| stage.rules_inserted).sum()
    }

    pub fn rows_skipped(&self) -> usize {
        self.stages.iter().map(|stage| stage.rows_skipped).sum()
    }

    fn format_duration(secs: f64) -> String {
        if secs < 60.0 {
            format!("{:.1}s", secs)
        } else if secs < 3600.0 {
            format!("{:.1}m", secs / 60.0)
        } else {
            format!("{:.1}h", secs / 3600.0)
        }
    }

    pub fn log_summary(&self) {
        info!("=== RAD compile summary ===");
        for stage in &self.stages {
            if stage.source_missing {
                info!("{:<24} skipped (no source data)", stage.name);
                continue;
            }
            info!(
                "{:<24} rows={} inserted={} existing={} skipped={} links={} dropped={} in {}",
                stage.name,
                stage.rows_read,
                stage.rules_inserted,
                stage.rules_existing,
                stage.rows_skipped,
                stage.links_created,
                stage.conditions_dropped,
                Self::format_duration(stage.duration_secs)
            );
        }
        info!(
            "Compiled {} new rules ({} rows skipped) in {}",
            self.rules_inserted(),
            self.rows_skipped(),
            Self::format_duration(self.total_duration_secs)
        );
    }
}
