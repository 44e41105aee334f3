//! Loading indicator state for a page.

use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadState {
    loading: bool,
    progress: u8,
    message: Option<String>,
}

impl LoadState {
    pub fn new() -> Self { Self::default() }

    pub fn start(&mut self, message: impl Into<String>) {
        self.loading = true;
        self.progress = 0;
        self.message = Some(message.into());
    }

    /// Progress is clamped to 0..=100. A `None` message keeps the current one.
    pub fn update(&mut self, progress: i32, message: Option<&str>) {
        self.progress = progress.clamp(0, 100) as u8;
        if let Some(message) = message {
            self.message = Some(message.to_string());
        }
    }

    pub fn finish(&mut self) {
        self.progress = 100;
        self.loading = false;
    }

    pub fn reset(&mut self) { *self = Self::default(); }

    pub fn is_loading(&self) -> bool { self.loading }
    pub fn progress(&self) -> u8 { self.progress }
    pub fn message(&self) -> Option<&str> { self.message.as_deref() }
}
