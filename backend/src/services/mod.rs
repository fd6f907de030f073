//! Business logic services for the Reorder Planning service

pub mod history;
pub mod planning;
pub mod reporting;

pub use history::HistoryRepository;
pub use planning::PlanningService;
pub use reporting::ReportingService;
