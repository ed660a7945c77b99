//! CLI Commands

pub mod case_id;
pub mod check;
pub mod date;
pub mod otp;
pub mod sheet;
pub mod template;
