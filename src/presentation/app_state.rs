// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use chrono::NaiveDate;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub title: String,
    /// Date the freshness gate is evaluated against
    pub today: fn() -> NaiveDate,
}

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
