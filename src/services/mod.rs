pub mod case_service;
pub mod notification;
pub mod reconstruction;
pub mod storage;
