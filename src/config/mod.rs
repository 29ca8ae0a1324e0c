//! Configuration module

mod site;

pub use site::NavPage;
pub use site::Site;
pub use site::SocialNetwork;
