pub mod chart_service;
pub mod crypto_service;
pub mod dashboard_service;
pub mod geocode_service;
pub mod health_service;
pub mod stats_service;
pub mod stock_service;
pub mod weather_service;
