pub mod otp;
pub mod token_service;
