//! Web page fetching, caching, and company-profile extraction.
//!
//! - [`PageCache`] holds one fetched page per requested URL for the life of
//!   the process, populated at most once even under concurrent requests.
//! - [`PageFetcher`] performs the HTTP GET and renders the body to text.
//! - [`extract_company_info`] turns a landing page into a [`CompanyInfo`].

pub mod cache;
pub mod company;
pub mod fetcher;

pub use cache::PageCache;
pub use company::{
    CompanyInfo, ContactInfo, company_info_from_page, company_name, extract_company_info,
    extract_contacts,
};
pub use fetcher::{PageFetcher, page_title};
