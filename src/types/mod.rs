//! Shared request and response shapes.

mod pagination;
mod response;

pub use pagination::{
    empty_string_as_none, InquiryPage, Page, PageRequest, PaginationParams, PropertyPage, UserPage,
};
pub use response::{ApiResponse, Created};
