//! Outbound service integrations

pub mod sms;

pub use sms::SmsService;
