//! Windows toast notifications.

use windows::core::HSTRING;
use windows::Data::Xml::Dom::XmlDocument;
use windows::UI::Notifications::{ToastNotification, ToastNotificationManager};

use crate::error::{Result, SystemError};
use crate::notification::{toast_xml, Toast, Toaster};

impl From<windows::core::Error> for SystemError {
    fn from(err: windows::core::Error) -> Self {
        Self::Notification(err.message())
    }
}

/// Shows toasts under an AppUserModelID.
#[derive(Debug, Clone)]
pub struct WindowsToaster {
    app_id: HSTRING,
}

impl WindowsToaster {
    pub fn new(app_id: &str) -> Self {
        Self {
            app_id: HSTRING::from(app_id),
        }
    }
}

impl Toaster for WindowsToaster {
    fn show(&self, toast: &Toast) -> Result<()> {
        let document = XmlDocument::new()?;
        document.LoadXml(&HSTRING::from(toast_xml(toast)))?;

        let notification = ToastNotification::CreateToastNotification(&document)?;
        ToastNotificationManager::CreateToastNotifierWithId(&self.app_id)?.Show(&notification)?;
        Ok(())
    }
}
