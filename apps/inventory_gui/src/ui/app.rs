use client_core::{
    delete_prompt, EditSession, FormMode, RowAction, SubmitOutcome, TypeFieldInputs,
    VehicleFormController, VehicleListView,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{VehicleId, VehicleKind},
    protocol::{ListFilter, MutationAck},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{err_label, UiError, UiEvent},
    orchestration::dispatch_backend_command,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

pub struct InventoryApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    list: VehicleListView,
    form: VehicleFormController,
    session: EditSession,

    brand_filter: String,
    type_filter: Option<VehicleKind>,
    pending_delete: Option<VehicleId>,
    form_error: Option<String>,

    status: String,
    status_banner: Option<StatusBanner>,
}

impl InventoryApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, show_ids: bool) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            list: VehicleListView::new(show_ids),
            form: VehicleFormController::default(),
            session: EditSession::Idle,
            brand_filter: String::new(),
            type_filter: None,
            pending_delete: None,
            form_error: None,
            status: "Starting...".to_string(),
            status_banner: None,
        };
        app.queue(BackendCommand::List {
            filter: ListFilter::default(),
        });
        app
    }

    fn queue(&mut self, cmd: BackendCommand) {
        if let Err(status) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: status.clone(),
            });
            self.status = status;
        }
    }

    fn current_filter(&self) -> ListFilter {
        ListFilter::new(
            Some(self.brand_filter.as_str()),
            self.type_filter.map(VehicleKind::as_str),
        )
    }

    fn report_ack(&mut self, action: &str, ack: &MutationAck) {
        if ack.ok {
            self.status = format!("{action} succeeded");
        } else {
            let message = format!(
                "{action} rejected by server: {}",
                ack.error.as_deref().unwrap_or("no reason given")
            );
            self.status = message.clone();
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Warning,
                message,
            });
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::VehiclesLoaded { filter, vehicles } => {
                    self.list.replace(&vehicles);
                    self.status = if filter.is_empty() {
                        format!("{} vehicles", vehicles.len())
                    } else {
                        format!("{} vehicles match the filter", vehicles.len())
                    };
                }
                UiEvent::EditLoaded(vehicle) => {
                    self.form_error = None;
                    self.form.populate(&vehicle, &mut self.session);
                }
                UiEvent::Submitted(outcome) => {
                    self.form.complete_submission(&mut self.session);
                    self.form_error = None;
                    match &outcome {
                        SubmitOutcome::Added(ack) => self.report_ack("Add", ack),
                        SubmitOutcome::Updated { id, ack } => {
                            self.report_ack(&format!("Update of {id}"), ack)
                        }
                    }
                }
                UiEvent::Deleted { id, ack } => self.report_ack(&format!("Delete of {id}"), &ack),
                UiEvent::StoreLoaded(ack) => self.report_ack("Load JSON", &ack),
                UiEvent::StoreSaved(ack) => self.report_ack("Save JSON", &ack),
                UiEvent::Error(err) => self.show_error(err),
            }
        }
    }

    fn show_error(&mut self, err: UiError) {
        let text = format!(
            "{} failed ({}): {}",
            err.context().label(),
            err_label(err.category()),
            err.message()
        );
        if err.belongs_in_banner() {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: text.clone(),
            });
        } else if self.form.visible {
            self.form_error = Some(err.message().to_string());
        }
        self.status = text;
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Warning => (
                    egui::Color32::from_rgb(110, 90, 40),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(180, 150, 80)),
                ),
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("filter_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Brand");
                ui.add(
                    egui::TextEdit::singleline(&mut self.brand_filter)
                        .hint_text("any")
                        .desired_width(140.0),
                );
                ui.label("Type");
                egui::ComboBox::from_id_salt("type_filter")
                    .selected_text(self.type_filter.map_or("Any", VehicleKind::label))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.type_filter, None, "Any");
                        for kind in VehicleKind::ALL {
                            ui.selectable_value(&mut self.type_filter, Some(kind), kind.label());
                        }
                    });
                if ui.button("Filter").clicked() {
                    let filter = self.current_filter();
                    self.queue(BackendCommand::List { filter });
                }
                if ui.button("Clear").clicked() {
                    self.brand_filter.clear();
                    self.type_filter = None;
                    self.queue(BackendCommand::List {
                        filter: ListFilter::default(),
                    });
                }

                ui.separator();
                let mut show_ids = self.list.show_ids();
                if ui.checkbox(&mut show_ids, "Show IDs").changed() {
                    self.list.set_show_ids(show_ids);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Save JSON").clicked() {
                        self.queue(BackendCommand::SaveJson);
                    }
                    if ui.button("Load JSON").clicked() {
                        self.queue(BackendCommand::LoadJson);
                    }
                    if ui.button("Add Vehicle").clicked() {
                        self.form_error = None;
                        self.form.open_for_add(&mut self.session);
                    }
                });
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(&self.status);
        });
    }

    fn show_table(&mut self, ctx: &egui::Context) {
        let mut clicked: Option<RowAction> = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("vehicle_table")
                    .striped(true)
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| {
                        for column in self.list.columns() {
                            ui.strong(column);
                        }
                        ui.strong("Actions");
                        ui.end_row();

                        for row in self.list.rows() {
                            for cell in self.list.cells(row) {
                                ui.label(cell);
                            }
                            ui.horizontal(|ui| {
                                for action in &row.actions {
                                    if ui.small_button(action.label()).clicked() {
                                        clicked = Some(action.clone());
                                    }
                                }
                            });
                            ui.end_row();
                        }
                    });
                if self.list.rows().is_empty() {
                    ui.weak("No vehicles.");
                }
            });
        });

        match clicked {
            Some(RowAction::Edit(id)) => self.queue(BackendCommand::FetchForEdit { id }),
            Some(RowAction::Delete(id)) => self.pending_delete = Some(id),
            None => {}
        }
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(id) = self.pending_delete.clone() else {
            return;
        };
        let mut answer = None;
        egui::Window::new("Confirm delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(delete_prompt(&id));
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("Keep").clicked() {
                        answer = Some(false);
                    }
                });
            });

        match answer {
            Some(true) => {
                self.pending_delete = None;
                self.queue(BackendCommand::Delete { id });
            }
            Some(false) => self.pending_delete = None,
            None => {}
        }
    }

    fn show_form(&mut self, ctx: &egui::Context) {
        if !self.form.visible {
            return;
        }
        let mode = FormMode::of(&self.session);
        let mut submit = false;
        let mut cancel = false;

        egui::Window::new(mode.title())
            .id(egui::Id::new("vehicle_form"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("vehicle_form_fields")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Type");
                        let mut kind = self.form.kind();
                        egui::ComboBox::from_id_salt("vehicle_form_type")
                            .selected_text(kind.label())
                            .show_ui(ui, |ui| {
                                for option in VehicleKind::ALL {
                                    ui.selectable_value(&mut kind, option, option.label());
                                }
                            });
                        self.form.on_type_changed(kind);
                        ui.end_row();

                        ui.label("Brand");
                        ui.text_edit_singleline(&mut self.form.brand);
                        ui.end_row();
                        ui.label("Model");
                        ui.text_edit_singleline(&mut self.form.model);
                        ui.end_row();
                        ui.label("Year");
                        ui.text_edit_singleline(&mut self.form.year);
                        ui.end_row();

                        type_field_rows(ui, &mut self.form);
                    });

                if let Some(error) = &self.form_error {
                    ui.colored_label(egui::Color32::from_rgb(220, 110, 110), error);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(mode.submit_label()).clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if cancel {
            self.form_error = None;
            self.form.cancel(&mut self.session);
        } else if submit {
            match self.form.build_submission(&self.session) {
                Ok(submission) => {
                    self.form_error = None;
                    self.queue(BackendCommand::Submit(submission));
                }
                Err(err) => self.form_error = Some(err.to_string()),
            }
        }
    }
}

fn type_field_rows(ui: &mut egui::Ui, form: &mut VehicleFormController) {
    match &mut form.type_fields {
        TypeFieldInputs::Car { doors, fuel } => {
            ui.label("Doors");
            ui.text_edit_singleline(doors);
            ui.end_row();
            ui.label("Fuel");
            ui.text_edit_singleline(fuel);
            ui.end_row();
        }
        TypeFieldInputs::Bike { sidecar, category } => {
            ui.label("Sidecar");
            ui.checkbox(sidecar, "");
            ui.end_row();
            ui.label("Category");
            ui.text_edit_singleline(category);
            ui.end_row();
        }
        TypeFieldInputs::Truck { payload, trailer } => {
            ui.label("Payload");
            ui.text_edit_singleline(payload);
            ui.end_row();
            ui.label("Trailer");
            ui.checkbox(trailer, "");
            ui.end_row();
        }
        TypeFieldInputs::Motorcycle { cc, category } => {
            ui.label("CC");
            ui.text_edit_singleline(cc);
            ui.end_row();
            ui.label("Category");
            ui.text_edit_singleline(category);
            ui.end_row();
        }
    }
}

impl eframe::App for InventoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_toolbar(ctx);
        self.show_table(ctx);
        self.show_form(ctx);
        self.show_delete_confirmation(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
