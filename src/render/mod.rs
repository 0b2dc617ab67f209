pub mod chart;
pub mod formatting;
pub mod page;
pub mod table;

pub use page::DashboardView;
