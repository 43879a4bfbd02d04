mod toast;

pub use toast::{Toast, ToastAction, ToastProvider, ToastState};
