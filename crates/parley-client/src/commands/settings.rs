//! Preference toggles.

use tracing::info;

use crate::error::Result;
use crate::events::{emit, SessionEvent};
use crate::prefs::Preferences;
use crate::session::Session;

impl Session {
    /// Toggle notification sounds on or off.
    pub fn set_sound_enabled(&self, enabled: bool) -> Result<Preferences> {
        let prefs = self.update_preferences(|p| p.sound_enabled = enabled)?;
        info!(enabled, "sound preference changed");
        Ok(prefs)
    }

    /// Toggle desktop notifications on or off. Enabling them asks the
    /// embedder to request platform permission.
    pub fn set_notifications_enabled(&self, enabled: bool) -> Result<Preferences> {
        let prefs = self.update_preferences(|p| p.notifications_enabled = enabled)?;
        if enabled {
            emit(&self.events, SessionEvent::NotificationPermissionRequested);
        }
        info!(enabled, "notification preference changed");
        Ok(prefs)
    }
}
