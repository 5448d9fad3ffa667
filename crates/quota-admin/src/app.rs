use quota_client_core::{Client, UiCallBack};
use tracing::info;

use crate::pages::UiUsers;

#[derive(Debug)]
pub struct QuotaAdminApp {
    client: Client,
    users_page: UiUsers,
}

impl eframe::App for QuotaAdminApp {
    /// Called each time the UI needs repainting, which may be many times per
    /// second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("User Daily Limits");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.client.server_address());
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.users_page.show(ui, &self.client);
        });

        // Request repaint after 1 second
        ctx.request_repaint_after(std::time::Duration::from_secs(1));
    }
}

impl QuotaAdminApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>, client: Client) -> Self {
        info!("Starting app");
        Self {
            client,
            users_page: Default::default(),
        }
    }
}

/// Requests a repaint so results that arrive in the background are shown
pub fn wake_fn(ctx: egui::Context) -> impl UiCallBack + Clone {
    move || ctx.request_repaint()
}
