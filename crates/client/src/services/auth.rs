use common::bus::AppEvent;
use common::models::User;
use common::toast::Toast;

use super::{failure_message, ServiceError};
use crate::api::v0::auth::{
    AuthResponse, CheckPhoneRequest, CheckUsernameRequest, LoginRequest, RegisterRequest,
    RegisterResponse, VerifyOtpRequest,
};
use crate::Pulse;

/// Result of a username/phone availability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Taken,
    /// The check itself failed; the form shows no error
    Unknown,
}

pub struct AuthService<'a> {
    pulse: &'a Pulse,
}

impl<'a> AuthService<'a> {
    pub(crate) fn new(pulse: &'a Pulse) -> Self {
        Self { pulse }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, ServiceError> {
        let request = LoginRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        };
        match self.pulse.client().call(request).await {
            Ok(response) => self.authenticated(response),
            Err(e) => {
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Login failed")));
                Err(e.into())
            }
        }
    }

    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ServiceError> {
        match self.pulse.client().call(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Registration failed")));
                Err(e.into())
            }
        }
    }

    #[tracing::instrument(skip(self, code))]
    pub async fn verify_otp(&self, identifier: &str, code: &str) -> Result<User, ServiceError> {
        let request = VerifyOtpRequest {
            identifier: identifier.to_string(),
            code: code.trim().to_string(),
        };
        match self.pulse.client().call(request).await {
            Ok(response) => self.authenticated(response),
            Err(e) => {
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Invalid verification code")));
                Err(e.into())
            }
        }
    }

    /// Forget the token locally and on disk
    pub fn logout(&self) -> Result<(), ServiceError> {
        if let Some(store) = self.pulse.session() {
            store.clear()?;
        }
        self.pulse.client().set_token(None);
        self.pulse.set_current_user(None);
        self.pulse
            .publish(AppEvent::SessionChanged { logged_in: false });
        tracing::info!("logged out");
        Ok(())
    }

    /// Fails closed: any error is reported as [`Availability::Unknown`]
    pub async fn username_availability(&self, username: &str) -> Availability {
        let request = CheckUsernameRequest {
            username: username.trim().to_string(),
        };
        match self.pulse.client().call(request).await {
            Ok(r) if r.available => Availability::Available,
            Ok(_) => Availability::Taken,
            Err(e) => {
                tracing::debug!(error = %e, "username availability check failed");
                Availability::Unknown
            }
        }
    }

    /// Fails closed: any error is reported as [`Availability::Unknown`]
    pub async fn phone_availability(&self, phone: &str) -> Availability {
        let request = CheckPhoneRequest {
            phone: phone.trim().to_string(),
        };
        match self.pulse.client().call(request).await {
            Ok(r) if r.available => Availability::Available,
            Ok(_) => Availability::Taken,
            Err(e) => {
                tracing::debug!(error = %e, "phone availability check failed");
                Availability::Unknown
            }
        }
    }

    fn authenticated(&self, response: AuthResponse) -> Result<User, ServiceError> {
        let AuthResponse { token, user } = response;
        if let Some(store) = self.pulse.session() {
            store.save(&crate::session::SavedSession {
                token: token.clone(),
                user: Some(user.clone()),
            })?;
        }
        self.pulse.client().set_token(Some(token));
        self.pulse.set_current_user(Some(user.clone()));
        self.pulse
            .publish(AppEvent::SessionChanged { logged_in: true });
        tracing::info!(username = %user.username, "logged in");
        Ok(user)
    }
}
