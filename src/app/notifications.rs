use std::time::{Duration, Instant};

use egui::{Align2, Color32, RichText};

const DEFAULT_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    fn color(&self) -> Color32 {
        match self {
            NotificationKind::Success => Color32::from_rgb(46, 160, 67),
            NotificationKind::Error => Color32::from_rgb(201, 42, 42),
        }
    }
}

pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    created: Instant,
}

/// Transient toast stack, drawn anchored to the top-right corner and
/// pruned once entries outlive their TTL.
pub struct Notifications {
    entries: Vec<Notification>,
    ttl: Duration,
}

impl Notifications {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn success(&mut self, title: &str, message: &str) {
        self.push(NotificationKind::Success, title, message);
    }

    pub fn error(&mut self, title: &str, message: &str) {
        self.push(NotificationKind::Error, title, message);
    }

    fn push(&mut self, kind: NotificationKind, title: &str, message: &str) {
        self.entries.push(Notification {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            created: Instant::now(),
        });
    }

    fn prune(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|entry| entry.created.elapsed() < ttl);
    }

    pub fn draw(&mut self, ctx: &egui::Context) {
        self.prune();
        if self.entries.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("notifications"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .interactable(false)
            .show(ctx, |ui| {
                for entry in &self.entries {
                    egui::Frame::popup(&ctx.style()).show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.label(
                            RichText::new(&entry.title)
                                .strong()
                                .color(entry.kind.color()),
                        );
                        ui.label(&entry.message);
                    });
                    ui.add_space(6.0);
                }
            });
        // Keep repainting so expired toasts disappear without user input.
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pushed_notifications_are_retained_within_ttl() {
        let mut notifications = Notifications::new();
        notifications.success("Analysis Complete", "Results are displayed below.");
        notifications.error("Analysis Failed", "model unavailable");
        notifications.prune();
        assert_eq!(notifications.entries.len(), 2);
        assert_eq!(notifications.entries[0].kind, NotificationKind::Success);
    }

    #[test]
    fn test_expired_notifications_are_pruned() {
        let mut notifications = Notifications {
            entries: Vec::new(),
            ttl: Duration::ZERO,
        };
        notifications.error("Analysis Failed", "model unavailable");
        notifications.prune();
        assert!(notifications.entries.is_empty());
    }
}
