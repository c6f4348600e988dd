//! Domain records stored in the document store
//!
//! Field names serialize in camelCase so documents written by older clients
//! of the same collections keep deserializing.

pub mod card;
pub mod finance;
pub mod gallery;
pub mod news;
pub mod site;
pub mod user;

pub use card::{CardForm, CardSide, IdCard};
pub use finance::{
    FundingRequest, NewFundingRequest, NewTransaction, RequestStatus, Transaction,
};
pub use gallery::GalleryAlbum;
pub use news::{DownloadLink, NewsItem};
pub use site::{FooterSettings, HomepageSettings, SocialLink};
pub use user::{Credential, Role, UserProfile, UserRecord};
