//! Reusable chart widgets

mod history_chart;

pub use history_chart::HistoryChart;
