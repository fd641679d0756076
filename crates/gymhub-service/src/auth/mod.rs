//! Identity provider flows exposed to the API.

pub mod service;

pub use service::{
    AuthMessage, AuthService, PasswordResetCompleted, PasswordResetStarted, RegistrationStarted,
    UserInfo,
};
