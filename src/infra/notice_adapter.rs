use crate::app::ports::{Notice, NoticeKind, NoticePort};
use tracing::{error, info};

/// Prints notices to stderr and mirrors them into the log
pub struct ConsoleNotice;

impl NoticePort for ConsoleNotice {
    fn show(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => {
                info!(notice = %notice.message, "notice");
                eprintln!("✓ {}", notice.message);
            }
            NoticeKind::Error => {
                error!(notice = %notice.message, "notice");
                eprintln!("✗ {}", notice.message);
            }
        }
    }
}
