use std::sync::Arc;
use std::time::Duration;

use egui::{Color32, RichText};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tower::{Service, ServiceExt};
use tracing::{debug, error, info, warn};

use crate::app::notifications::Notifications;
use crate::app::views::result_view::ResultView;
use crate::app::views::upload_view::{UploadAction, UploadView};
use crate::app::views::View;
use crate::config::Settings;
use crate::error::{AppError, PredictError};
use crate::predict::{HttpPredictor, PredictService, Predictor, Verdict};
use crate::session::{AnalysisSession, Applied, Phase, SelectedImage};

const HEALTH_PROBE_INTERVAL: Duration = Duration::from_secs(10);

pub enum UiUpdate {
    AnalysisFinished {
        token: u64,
        outcome: Result<Verdict, PredictError>,
    },
    Health(HealthStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Unknown,
    Online,
    ModelUnloaded,
    Offline,
}

/// The desktop front end. Owns the session and the predictor service;
/// analysis outcomes and health probes come back over an mpsc channel and
/// are applied between frames.
pub struct ScanApp {
    session: AnalysisSession,
    predict_service: PredictService,
    update_tx: mpsc::Sender<UiUpdate>,
    update_rx: mpsc::Receiver<UiUpdate>,
    notifications: Notifications,
    health: HealthStatus,
    health_task: JoinHandle<()>,
}

impl ScanApp {
    fn new(
        predict_service: PredictService,
        update_tx: mpsc::Sender<UiUpdate>,
        update_rx: mpsc::Receiver<UiUpdate>,
        health_task: JoinHandle<()>,
    ) -> Self {
        Self {
            session: AnalysisSession::new(),
            predict_service,
            update_tx,
            update_rx,
            notifications: Notifications::new(),
            health: HealthStatus::Unknown,
            health_task,
        }
    }

    pub fn start_gui(settings: Settings) -> Result<(), AppError> {
        let predictor: Arc<dyn Predictor> = Arc::new(HttpPredictor::new(&settings.predictor)?);
        let predict_service = PredictService::new(predictor.clone());
        let (update_tx, update_rx) = mpsc::channel::<UiUpdate>(100);

        let health_tx = update_tx.clone();
        let health_task = tokio::spawn(async move {
            loop {
                let status = match predictor.health().await {
                    Ok(health) if health.model_loaded => HealthStatus::Online,
                    Ok(health) => {
                        warn!(status = %health.status, "predictor reachable but model not loaded");
                        HealthStatus::ModelUnloaded
                    }
                    Err(e) => {
                        debug!(error = %e, "health probe failed");
                        HealthStatus::Offline
                    }
                };
                if health_tx.send(UiUpdate::Health(status)).await.is_err() {
                    break;
                }
                tokio::time::sleep(HEALTH_PROBE_INTERVAL).await;
            }
        });

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(900.0, 780.0))
                .with_title("MediScan"),
            ..Default::default()
        };

        eframe::run_native(
            "MediScan",
            options,
            Box::new(move |cc| {
                egui_extras::install_image_loaders(&cc.egui_ctx);
                Ok(Box::new(ScanApp::new(
                    predict_service,
                    update_tx,
                    update_rx,
                    health_task,
                )))
            }),
        )
        .map_err(|e| AppError::Ui(e.to_string()))
    }

    fn drain_updates(&mut self) {
        loop {
            match self.update_rx.try_recv() {
                Ok(UiUpdate::AnalysisFinished { token, outcome }) => {
                    self.finish_analysis(token, outcome);
                }
                Ok(UiUpdate::Health(status)) => {
                    if status != self.health {
                        info!(?status, "predictor health changed");
                    }
                    self.health = status;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    error!("ui update channel disconnected");
                    break;
                }
            }
        }
    }

    fn finish_analysis(&mut self, token: u64, outcome: Result<Verdict, PredictError>) {
        if let Err(e) = &outcome {
            error!(token, error = %e, "analysis failed");
        }
        match self.session.apply_outcome(token, outcome) {
            Applied::Completed => {
                info!(token, "analysis completed");
                self.notifications
                    .success("Analysis Complete", "Results are displayed below.");
            }
            Applied::Failed => {
                let message = self
                    .session
                    .error()
                    .unwrap_or("Failed to analyze image")
                    .to_string();
                self.notifications.error("Analysis Failed", &message);
            }
            Applied::Stale => debug!(token, "stale analysis outcome discarded"),
        }
    }

    fn start_analysis(&mut self) {
        let request = match self.session.begin_analysis() {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "analysis not started");
                return;
            }
        };
        let token = request.token;
        let mut service = self.predict_service.clone();
        let tx = self.update_tx.clone();
        tokio::spawn(async move {
            let outcome = match service.ready().await {
                Ok(ready) => ready.call(request.image).await,
                Err(e) => Err(e),
            };
            if tx
                .send(UiUpdate::AnalysisFinished { token, outcome })
                .await
                .is_err()
            {
                debug!(token, "ui closed before the analysis outcome arrived");
            }
        });
    }

    fn install_image(&mut self, ctx: &egui::Context, image: SelectedImage) {
        info!(image = %image.id(), filename = %image.filename(), "image selected");
        ctx.include_bytes(
            image.preview_uri(),
            egui::load::Bytes::Shared(image.bytes().clone()),
        );
        if let Some(replaced) = self.session.select_image(image) {
            ctx.forget_image(&replaced.preview_uri());
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        let picked = if let Some(bytes) = file.bytes {
            SelectedImage::from_bytes(file.name.clone(), bytes)
        } else if let Some(path) = file.path {
            SelectedImage::from_path(&path)
        } else {
            return;
        };
        match picked {
            Ok(image) => self.install_image(ctx, image),
            Err(e) => {
                warn!(error = %e, "dropped file rejected");
                self.notifications.error("Unsupported File", &e.to_string());
            }
        }
    }

    fn browse_for_image(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        else {
            return;
        };
        match SelectedImage::from_path(&path) {
            Ok(image) => self.install_image(ctx, image),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "picked file rejected");
                self.notifications.error("Unsupported File", &e.to_string());
            }
        }
    }

    fn clear_selection(&mut self, ctx: &egui::Context) {
        match self.session.clear() {
            Ok(Some(released)) => ctx.forget_image(&released.preview_uri()),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "clear rejected"),
        }
    }

    fn draw_header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("MediScan");
                ui.label(RichText::new("Cancer Cell Detection System").weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (text, color) = match self.health {
                        HealthStatus::Unknown => {
                            ("● Checking predictor…", Color32::GRAY)
                        }
                        HealthStatus::Online => {
                            ("● Predictor online", Color32::from_rgb(46, 160, 67))
                        }
                        HealthStatus::ModelUnloaded => {
                            ("● Model not loaded", Color32::from_rgb(217, 119, 6))
                        }
                        HealthStatus::Offline => {
                            ("● Predictor offline", Color32::from_rgb(201, 42, 42))
                        }
                    };
                    ui.label(RichText::new(text).color(color));
                });
            });
        });
    }

    fn draw_central(&mut self, ctx: &egui::Context, hovering_files: bool) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new("AI-Powered Cancer Detection")
                            .size(26.0)
                            .strong(),
                    );
                    ui.label(
                        "Upload a medical image for instant analysis by the remote \
                         detection model.",
                    );
                });
                ui.add_space(12.0);

                let analyzing = self.session.phase() == Phase::Analyzing;
                let action =
                    UploadView::new(self.session.image(), analyzing, hovering_files).draw(ui);
                match action {
                    UploadAction::Browse => self.browse_for_image(ctx),
                    UploadAction::Clear => self.clear_selection(ctx),
                    UploadAction::None => {}
                }

                ui.add_space(12.0);
                match self.session.phase() {
                    Phase::Idle => {
                        if self.session.image().is_some() {
                            ui.vertical_centered(|ui| {
                                let analyze = egui::Button::new(
                                    RichText::new("Analyze Image").size(16.0),
                                )
                                .min_size(egui::vec2(200.0, 36.0));
                                if ui.add(analyze).clicked() {
                                    self.start_analysis();
                                }
                            });
                        }
                    }
                    Phase::Analyzing => {
                        ui.vertical_centered(|ui| {
                            ui.spinner();
                            ui.label("Analyzing...");
                        });
                    }
                    Phase::Completed => {
                        if let Some(verdict) = self.session.result() {
                            ResultView::new(verdict).draw(ui);
                        }
                        ui.add_space(8.0);
                        ui.vertical_centered(|ui| {
                            if ui.button("Analyze Another Image").clicked() {
                                self.clear_selection(ctx);
                            }
                        });
                    }
                    Phase::Failed => {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.label(
                                RichText::new("Analysis Failed")
                                    .size(18.0)
                                    .strong()
                                    .color(Color32::from_rgb(201, 42, 42)),
                            );
                            if let Some(message) = self.session.error() {
                                ui.label(message);
                            }
                        });
                        ui.add_space(8.0);
                        ui.vertical_centered(|ui| {
                            if ui.button("Analyze Another Image").clicked() {
                                self.clear_selection(ctx);
                            }
                        });
                    }
                }
            });
        });
    }
}

impl eframe::App for ScanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_updates();
        self.handle_dropped_files(ctx);
        let hovering_files = ctx.input(|i| !i.raw.hovered_files.is_empty());

        self.draw_header(ctx);
        self.draw_central(ctx, hovering_files);
        self.notifications.draw(ctx);

        // The outcome channel is only drained on repaint; keep frames coming
        // while a call is in flight.
        if self.session.phase() == Phase::Analyzing {
            ctx.request_repaint_after(Duration::from_millis(150));
        }
    }
}

impl Drop for ScanApp {
    fn drop(&mut self) {
        self.health_task.abort();
    }
}
