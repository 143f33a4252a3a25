pub mod outcome;
pub mod request;
pub mod status;
