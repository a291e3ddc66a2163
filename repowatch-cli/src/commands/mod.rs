pub mod notify;
pub mod run;
pub mod status;
pub mod sweep;
