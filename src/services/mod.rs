pub mod admission;
pub use admission::{Admission, AdmissionController, AdmissionPolicy};

pub mod notice_service;
pub mod notice_service_impl;
pub use notice_service::NoticeSource;
pub use notice_service_impl::BoardNoticeSource;

pub mod reply;
pub use reply::{DayWindow, ListingService};
