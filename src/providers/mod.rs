pub mod webhook;
pub mod zapi;
