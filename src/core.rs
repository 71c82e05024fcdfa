pub mod features;
pub mod history;
pub mod preferences;
pub mod storage;
