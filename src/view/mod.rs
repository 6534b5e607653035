//! # View Module
//!
//! Output configuration, template rendering and the page cache hook.
//!
//! A [`View`] is created while the `resources` configuration is wired and shared
//! (`Arc<View>`) with the controller and, when the controller uses one, with its
//! [`Layout`]. Templates are rendered with `minijinja`; the templating language
//! itself is minijinja's.
//!
//! ## View options
//!
//! | Key | Default | Meaning |
//! |---|---|---|
//! | `encoding` | `UTF-8` | charset announced in `Content-Type` |
//! | `scriptPath` | `<application>/views` | directory templates are read from |
//!
//! ## Page cache
//!
//! When caching is activated (`cache.is_cache`), the dispatch pipeline hands the
//! final response body to [`View::save_cache`], which stores it in the attached
//! [`PageCache`] under the current page key. Controllers can opt a page out with
//! [`View::disable_page_cache`].

mod cache;
mod layout;
mod view;

pub use cache::{MemoryPageCache, PageCache};
pub use layout::Layout;
pub use view::View;
