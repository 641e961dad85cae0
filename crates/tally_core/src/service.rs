use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::{
    clock::{Clock, SystemClock},
    demo,
    document::{DaySummary, Document},
    error::Result,
    heatmap::{self, HeatmapFrame, ViewMode},
    progress::{DailyProgress, TaskState},
    registry::{self, AddOutcome, RemoveOutcome},
    store::JsonStore,
    years::{self, YearNavigator},
};

pub const DEFAULT_DATA_FILE: &str = "tasks.json";

/// Owns the document and keeps the file in step with it. Adding, removing,
/// committing and rolling over are written out immediately; checkbox toggles
/// stay in memory until [`TallyService::commit_day`].
pub struct TallyService {
    store: JsonStore,
    clock: Box<dyn Clock>,
    document: Document,
    progress: DailyProgress,
    navigator: YearNavigator,
}

pub struct TallyServiceBuilder {
    data_file: PathBuf,
    clock: Box<dyn Clock>,
    seed: Option<Document>,
    sample_from_year: Option<i32>,
}

impl TallyServiceBuilder {
    pub fn new() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            clock: Box::new(SystemClock),
            seed: None,
            sample_from_year: None,
        }
    }

    pub fn data_file(mut self, path: impl AsRef<Path>) -> Self {
        self.data_file = path.as_ref().to_path_buf();
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Document written instead of the default when the data file is missing.
    pub fn with_seed(mut self, seed: Document) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seeds a missing data file with [`demo::sample_document`] starting at
    /// `first_year`, dated by the builder's clock. An explicit
    /// [`Self::with_seed`] takes precedence.
    pub fn with_sample_history(mut self, first_year: i32) -> Self {
        self.sample_from_year = Some(first_year);
        self
    }

    pub fn build(self) -> Result<TallyService> {
        let store = JsonStore::new(&self.data_file);
        let today = self.clock.today();
        let seed = self.seed.or_else(|| {
            self.sample_from_year
                .map(|first_year| demo::sample_document(first_year, today))
        });
        let document = store.load_or_seed(today, seed)?;
        let progress = DailyProgress::start(today, &document);
        info!(path = %store.path().display(), %today, "tally service ready");
        Ok(TallyService {
            store,
            clock: self.clock,
            document,
            progress,
            navigator: YearNavigator::new(today),
        })
    }
}

impl Default for TallyServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TallyService {
    pub fn builder() -> TallyServiceBuilder {
        TallyServiceBuilder::new()
    }

    pub fn data_file(&self) -> &Path {
        self.store.path()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tasks(&self) -> &[String] {
        registry::list_tasks(&self.document)
    }

    pub fn menu_entries(&self) -> Vec<String> {
        registry::menu_entries(&self.document)
    }

    pub fn add_task(&mut self, name: &str) -> Result<AddOutcome> {
        let outcome = registry::add_task(&mut self.document, name);
        if outcome == AddOutcome::Added {
            self.store.save(&self.document)?;
            info!(task = %name.trim(), "task added");
        }
        Ok(outcome)
    }

    /// Deletes a task everywhere. The caller is responsible for confirming
    /// with the user before calling this.
    pub fn remove_task(&mut self, name: &str) -> Result<RemoveOutcome> {
        let outcome = registry::remove_task(&mut self.document, name);
        if outcome == RemoveOutcome::Removed {
            self.progress.forget(name);
            self.store.save(&self.document)?;
            info!(task = %name, "task removed");
        }
        Ok(outcome)
    }

    /// The tracked day. Lags behind the clock until [`Self::rollover_check`]
    /// runs.
    pub fn today(&self) -> NaiveDate {
        self.progress.today()
    }

    pub fn today_state(&self) -> Vec<TaskState> {
        self.progress.today_state(&self.document.tasks)
    }

    /// Flips a task's checkbox. Unknown names are ignored.
    pub fn toggle(&mut self, task: &str) -> Option<bool> {
        if !self.document.tasks.iter().any(|t| t == task) {
            return None;
        }
        Some(self.progress.toggle(task))
    }

    pub fn on_task_toggled(&mut self, task: &str, done: bool) {
        if self.document.tasks.iter().any(|t| t == task) {
            self.progress.set_done(task, done);
        }
    }

    /// Writes today's checkboxes as a summary. Committing again the same day
    /// replaces the earlier summary, including after a restart, when every
    /// box starts unchecked.
    pub fn commit_day(&mut self) -> Result<DaySummary> {
        let summary = self.progress.commit(&mut self.document);
        self.store.save(&self.document)?;
        Ok(summary)
    }

    /// Compares the tracked day with the clock and moves to the new date if
    /// midnight has passed. Returns `true` when the caller should refresh.
    pub fn rollover_check(&mut self) -> Result<bool> {
        let system_date = self.clock.today();
        let previous = self.progress.today();
        if !self.progress.rollover(system_date, &mut self.document) {
            return Ok(false);
        }
        // Keep following the trailing view across New Year.
        if self.navigator.active_year() == previous.year() {
            self.navigator.select_year(system_date.year(), system_date);
        }
        self.store.save(&self.document)?;
        Ok(true)
    }

    pub fn available_years(&self) -> Vec<i32> {
        years::available_years(&self.document.history)
    }

    pub fn year_choices(&self) -> Vec<i32> {
        self.navigator
            .year_choices(&self.document.history, self.clock.today())
    }

    pub fn active_year(&self) -> i32 {
        self.navigator.active_year()
    }

    pub fn select_year(&mut self, year: i32) -> ViewMode {
        self.navigator.select_year(year, self.clock.today())
    }

    pub fn view_mode(&self) -> ViewMode {
        self.navigator.view_mode(self.clock.today())
    }

    pub fn render(&self) -> HeatmapFrame {
        heatmap::render(
            &self.document.history,
            self.view_mode(),
            self.clock.today(),
        )
    }
}
