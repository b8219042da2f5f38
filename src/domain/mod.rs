pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod identity;
pub mod repositories;
