//! Frontend configuration

/// Toast presentation
pub struct ToastConfig;

impl ToastConfig {
    /// Time a toast stays on screen in milliseconds
    pub const DISPLAY_DURATION_MS: u32 = 4_000;

    /// Toasts shown at once; older ones are dropped first
    pub const MAX_VISIBLE: usize = 3;
}
