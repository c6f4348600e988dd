//! Services module
//!
//! Business logic over the document store. Each service is cheap to clone
//! and shares the store handle it was built with.

pub mod card_export;
pub mod card_render;
pub mod cards;
pub mod dashboard;
pub mod finance;
pub mod gallery;
pub mod news;
pub mod site;
pub mod users;

pub use card_export::{CardExporter, ExportedDocument, PagePlan};
pub use card_render::{CardRenderer, HttpPhotoSource, PhotoSource};
pub use cards::CardService;
pub use dashboard::{DashboardProjection, DashboardSummary, MonthBucket, TransparencyReport};
pub use finance::FinanceService;
pub use gallery::GalleryService;
pub use news::{NewNewsItem, NewsService};
pub use site::SiteService;
pub use users::{NewUser, UserCodes, UserService};
