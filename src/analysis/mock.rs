//! Canned analysis results for the mock variant.
//!
//! The numbers and text are fixed and entirely independent of whatever
//! dataset is loaded; they exist to demonstrate the dashboard contract
//! without a network dependency.

use crate::types::AnalysisSummary;

pub const MOCK_TOTAL_REVENUE: f64 = 8_940_000.0;
pub const MOCK_AVG_REVENUE: f64 = 745_000.0;
pub const MOCK_GROWTH: f64 = 12.5;
pub const MOCK_FORECAST: f64 = 980_000.0;

/// The summary served by [`AnalysisMode::Mock`](super::AnalysisMode::Mock).
pub fn sample_analysis() -> AnalysisSummary {
    AnalysisSummary {
        total_revenue: MOCK_TOTAL_REVENUE,
        avg_revenue: MOCK_AVG_REVENUE,
        growth: MOCK_GROWTH,
        forecast: MOCK_FORECAST,
        insights: vec![
            "Доходы показывают устойчивый рост на протяжении всего периода".to_string(),
            "Расходы остаются стабильными относительно оборота".to_string(),
            "Маржинальность выросла во втором полугодии".to_string(),
            "Сезонный спад в летние месяцы компенсирован осенью".to_string(),
        ],
        recommendations: vec![
            "Увеличить маркетинговый бюджет в высокий сезон".to_string(),
            "Пересмотреть структуру операционных расходов".to_string(),
            "Зафиксировать цены с ключевыми поставщиками".to_string(),
            "Создать резерв под сезонные колебания доходов".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_analysis_is_stable() {
        let a = sample_analysis();
        let b = sample_analysis();
        assert_eq!(a, b);
        assert_eq!(a.total_revenue, MOCK_TOTAL_REVENUE);
        assert_eq!(a.insights.len(), 4);
        assert_eq!(a.recommendations.len(), 4);
    }
}
