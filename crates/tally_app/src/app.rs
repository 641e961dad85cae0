use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use eframe::egui::{self, Color32, RichText};
use tally_core::{
    heatmap::HeatmapFrame,
    hover::HoverInfo,
    registry::{AddOutcome, RemoveOutcome, NO_TASKS_PLACEHOLDER},
    service::DEFAULT_DATA_FILE,
    TallyService,
};
use tracing::{debug, error, info, warn};

use crate::heatmap_view;

const DONE_COLOR: Color32 = Color32::from_rgb(0x2e, 0x8b, 0x57);
const PENDING_COLOR: Color32 = Color32::from_rgb(0xc0, 0x39, 0x2b);

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) data_file: PathBuf,
    pub(crate) rollover_interval: Duration,
    pub(crate) sample_from_year: Option<i32>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("TALLY_DATA_FILE") {
            if !path.trim().is_empty() {
                config.data_file = PathBuf::from(path);
            }
        }
        if let Ok(seconds) = std::env::var("TALLY_ROLLOVER_SECONDS") {
            match seconds.trim().parse::<u64>() {
                Ok(value) if value > 0 => config.rollover_interval = Duration::from_secs(value),
                _ => warn!(%seconds, "ignoring invalid TALLY_ROLLOVER_SECONDS"),
            }
        }
        if let Ok(year) = std::env::var("TALLY_SAMPLE_FROM_YEAR") {
            match year.trim().parse::<i32>() {
                Ok(value) => config.sample_from_year = Some(value),
                Err(_) => warn!(%year, "ignoring invalid TALLY_SAMPLE_FROM_YEAR"),
            }
        }
        Ok(config)
    }

    fn open_service(&self) -> Result<TallyService> {
        let mut builder = TallyService::builder().data_file(&self.data_file);
        if let Some(first_year) = self.sample_from_year {
            builder = builder.with_sample_history(first_year);
        }
        builder
            .build()
            .with_context(|| format!("unable to open {}", self.data_file.display()))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            rollover_interval: Duration::from_secs(60),
            sample_from_year: None,
        }
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(path = %config.data_file.display(), "starting tally");
    let service = config.open_service()?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Daily Tasks")
            .with_inner_size([420.0, 560.0])
            .with_window_level(egui::viewport::WindowLevel::AlwaysOnTop),
        ..Default::default()
    };
    eframe::run_native(
        "Tally",
        options,
        Box::new(move |_cc| Ok(Box::new(TallyApp::new(service, config)))),
    )
    .map_err(|err| anyhow!("event loop terminated: {err}"))
}

struct TallyApp {
    service: TallyService,
    config: AppConfig,
    frame: HeatmapFrame,
    new_task: String,
    removal_choice: Option<String>,
    hovered: Option<HoverInfo>,
    status: Option<String>,
    last_rollover_check: Instant,
}

impl TallyApp {
    fn new(service: TallyService, config: AppConfig) -> Self {
        let frame = service.render();
        let removal_choice = service.tasks().first().cloned();
        Self {
            service,
            config,
            frame,
            new_task: String::new(),
            removal_choice,
            hovered: None,
            status: None,
            last_rollover_check: Instant::now(),
        }
    }

    fn refresh_heatmap(&mut self) {
        self.frame = self.service.render();
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    fn report_failure(&mut self, action: &str, err: tally_core::TallyError) {
        error!(%err, action, "operation failed");
        let message = format!("Could not {action}: {err}");
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Tally")
            .set_description(message.as_str())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
        self.set_status(message);
    }

    fn poll_rollover(&mut self) {
        if self.last_rollover_check.elapsed() < self.config.rollover_interval {
            return;
        }
        self.last_rollover_check = Instant::now();
        match self.service.rollover_check() {
            Ok(true) => {
                info!(today = %self.service.today(), "date changed, checklist cleared");
                self.refresh_heatmap();
            }
            Ok(false) => {}
            Err(err) => self.report_failure("start the new day", err),
        }
    }

    fn add_task(&mut self) {
        let name = std::mem::take(&mut self.new_task);
        match self.service.add_task(&name) {
            Ok(AddOutcome::Added) => {
                if self.removal_choice.is_none() {
                    self.removal_choice = Some(name.trim().to_string());
                }
                self.status = None;
            }
            Ok(AddOutcome::Empty) => {}
            Ok(AddOutcome::Duplicate) => {
                self.set_status(format!("\"{}\" already exists", name.trim()));
            }
            Ok(AddOutcome::Reserved) => {
                self.set_status(format!("\"{}\" is a reserved name", name.trim()));
            }
            Err(err) => self.report_failure("add the task", err),
        }
    }

    fn save_progress(&mut self) {
        match self.service.commit_day() {
            Ok(summary) => {
                self.refresh_heatmap();
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Info)
                    .set_title("Saved")
                    .set_description(format!(
                        "Today's progress saved: {}/{} tasks done.",
                        summary.completed, summary.total
                    ))
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show();
            }
            Err(err) => self.report_failure("save today's progress", err),
        }
    }

    fn delete_selected_task(&mut self) {
        let Some(task) = self.removal_choice.clone() else {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_title("No task selected")
                .set_description("Select a task to delete.")
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
            return;
        };

        let answer = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Confirm deletion")
            .set_description(format!("Delete task \"{task}\" and its history?"))
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        if !matches!(answer, rfd::MessageDialogResult::Yes) {
            return;
        }

        match self.service.remove_task(&task) {
            Ok(RemoveOutcome::Removed) => {
                self.removal_choice = self.service.tasks().first().cloned();
                self.refresh_heatmap();
            }
            Ok(RemoveOutcome::NotFound) => {
                self.removal_choice = self.service.tasks().first().cloned();
            }
            Err(err) => self.report_failure("delete the task", err),
        }
    }

    fn task_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(format!("Today: {}", self.service.today()));
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.new_task)
                    .hint_text("New task")
                    .desired_width(180.0),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add task").clicked() || submitted {
                self.add_task();
            }
            if ui.button("Save progress").clicked() {
                self.save_progress();
            }
        });

        ui.separator();
        for state in self.service.today_state() {
            let color = if state.done { DONE_COLOR } else { PENDING_COLOR };
            let mut done = state.done;
            let label = RichText::new(&state.name).color(color).strong();
            let response = ui.checkbox(&mut done, label);
            if response.changed() {
                self.service.on_task_toggled(&state.name, done);
            }
        }
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Delete task").clicked() {
                self.delete_selected_task();
            }
            let selected_text = self
                .removal_choice
                .clone()
                .unwrap_or_else(|| NO_TASKS_PLACEHOLDER.to_string());
            egui::ComboBox::from_id_salt("removal_choice")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for entry in self.service.menu_entries() {
                        if entry == NO_TASKS_PLACEHOLDER && self.service.tasks().is_empty() {
                            ui.label(entry);
                            continue;
                        }
                        let label = entry.clone();
                        ui.selectable_value(&mut self.removal_choice, Some(entry), label);
                    }
                });
        });
    }

    fn heatmap_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut year = self.service.active_year();
            egui::ComboBox::from_id_salt("active_year")
                .selected_text(year.to_string())
                .show_ui(ui, |ui| {
                    for choice in self.service.year_choices() {
                        ui.selectable_value(&mut year, choice, choice.to_string());
                    }
                });
            if year != self.service.active_year() {
                let mode = self.service.select_year(year);
                debug!(year, ?mode, "heatmap year changed");
                self.refresh_heatmap();
            }

            let hover_text = self
                .hovered
                .map(|info| info.to_string())
                .unwrap_or_default();
            ui.centered_and_justified(|ui| ui.label(RichText::new(hover_text).strong()));
        });

        self.hovered = heatmap_view::show(ui, &self.frame);
    }
}

impl eframe::App for TallyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_rollover();
        ctx.request_repaint_after(self.config.rollover_interval);

        if let Some(status) = &self.status {
            let status = status.clone();
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| ui.label(status));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.label(RichText::new("Tasks").strong());
                self.task_panel(ui);
            });
            ui.add_space(8.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.label(RichText::new("Heatmap").strong());
                self.heatmap_panel(ui);
            });
        });
    }
}
