//! User-facing notices (the "toast" shown after a command).

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

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Prints notices to the terminal and mirrors them to the log
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => {
                log::debug!("[NOTICE] {}", notice.message);
                println!("{}", notice.message);
            }
            NoticeLevel::Error => {
                log::debug!("[NOTICE] error: {}", notice.message);
                eprintln!("{}", notice.message);
            }
        }
    }
}

/// Collects notices in memory
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    notices: std::sync::Mutex<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}
