//! User-visible notifications.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Blocking `window.alert` in the browser; a log line everywhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, notice: Notice) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&notice.message);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            match notice.level {
                NoticeLevel::Info => tracing::info!("{}", notice.message),
                NoticeLevel::Error => tracing::warn!("{}", notice.message),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{Notice, Notifier};

    /// Keeps every notice for later assertions.
    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        pub notices: Rc<RefCell<Vec<Notice>>>,
    }

    impl RecordingNotifier {
        pub fn taken(&self) -> Vec<Notice> {
            self.notices.borrow_mut().drain(..).collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }
    }
}
