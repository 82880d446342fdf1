//! Maps view model errors to cityweather_core::AppError for consistent user-facing messages.
//! Each screen has its own module to keep mappings small and readable.

mod detail;
mod favorites;
mod search;
