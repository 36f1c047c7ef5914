//! HTTP request handlers, grouped per resource.

pub mod borrow_request;
pub mod notification;
pub mod project;
