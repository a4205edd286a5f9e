use common::models::{ProfileUpdate, Settings, SettingsUpdate, User};
use common::toast::Toast;

use super::{failure_message, ServiceError};
use crate::api::v0::settings::{DeleteAccountRequest, UpdateProfileRequest, UpdateSettingsRequest};
use crate::session::SavedSession;
use crate::Pulse;

/// Profile edits, settings sections and account deletion
pub struct SettingsService<'a> {
    pulse: &'a Pulse,
}

impl<'a> SettingsService<'a> {
    pub(crate) fn new(pulse: &'a Pulse) -> Self {
        Self { pulse }
    }

    /// Apply profile changes and refresh the cached current user
    #[tracing::instrument(skip(self, update))]
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, ServiceError> {
        if update.is_empty() {
            return Err(ServiceError::Invalid("Nothing to update".to_string()));
        }
        let user = match self.pulse.client().call(UpdateProfileRequest { update }).await {
            Ok(user) => user,
            Err(e) => {
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Failed to update profile")));
                return Err(e.into());
            }
        };

        self.pulse.set_current_user(Some(user.clone()));
        if let (Some(store), Some(token)) = (self.pulse.session(), self.pulse.client().token()) {
            store.save(&SavedSession {
                token,
                user: Some(user.clone()),
            })?;
        }
        self.pulse.toast(Toast::success("Profile updated"));
        Ok(user)
    }

    #[tracing::instrument(skip(self, update), fields(section = update.section()))]
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings, ServiceError> {
        match self.pulse.client().call(UpdateSettingsRequest { update }).await {
            Ok(settings) => {
                self.pulse.toast(Toast::success("Settings saved"));
                Ok(settings)
            }
            Err(e) => {
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Failed to save settings")));
                Err(e.into())
            }
        }
    }

    /// Delete the account, then log out locally
    pub async fn delete_account(&self) -> Result<(), ServiceError> {
        if let Err(e) = self.pulse.client().call(DeleteAccountRequest {}).await {
            self.pulse
                .toast(Toast::error(failure_message(&e, "Failed to delete account")));
            return Err(e.into());
        }
        tracing::info!("account deleted");
        self.pulse.auth().logout()
    }
}
