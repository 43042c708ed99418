//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod nav;
pub mod chart;
pub mod loading;
pub mod thread_list;
pub mod toast;
pub mod usage_detail;

pub use nav::Nav;
pub use chart::UsageChart;
pub use loading::{InlineLoading, Loading, TypingIndicator};
pub use thread_list::ThreadList;
pub use toast::{ErrorBanner, Toast};
pub use usage_detail::UsageDetailDialog;
