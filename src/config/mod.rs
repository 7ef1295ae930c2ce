//! Configuration module

mod site;

pub use site::CmsConfig;
pub use site::FooterConfig;
pub use site::PreviewConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::ThemeConfig;
