/*!
Shared content types for the Sabor site.

Every editable page section is backed by one named document in the remote
content store. This crate defines the value-set types for those documents,
the compiled-in defaults each section falls back to while its document is
absent, and the color-theme catalog referenced by the `siteSettings`
document.

Nothing here performs I/O; `sabor_store` owns the store abstraction and
`sabor_client` owns the synchronization logic built on top of these types.
*/

pub mod sections;
pub mod themes;

pub use sections::{
    AboutContent, ContactContent, ContentSection, Dish, HeroContent, SiteSettings,
    CONTENT_COLLECTION, DISHES_COLLECTION,
};
pub use themes::{ColorTheme, default_theme, resolve_theme, THEMES};
