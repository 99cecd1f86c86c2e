//! Terminal rendering of results, history and date ranges.

use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::{object::Columns, Alignment, Style};

use portfolio_calc_core::display::{format_allocation, format_currency, format_percentage};
use portfolio_calc_core::i18n::Locale;
use portfolio_calc_core::models::chart::PerformanceCharts;
use portfolio_calc_core::models::performance::PortfolioPerformance;
use portfolio_calc_core::services::trading_calendar::DateSuggestions;

fn signed(value: f64, text: String) -> String {
    if value >= 0.0 {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Summary block followed by the per-stock table.
pub fn render_performance(locale: &Locale, performance: &PortfolioPerformance) -> String {
    let mut output = format!(
        "\n{}  {}\n\n",
        locale.t("portfolioPerformance").cyan().bold(),
        performance.client_name.bold()
    );

    let lines = [
        (locale.t("startDate"), performance.start_date.to_string()),
        (
            locale.t("initialBalance"),
            format_currency(performance.initial_balance),
        ),
        (
            locale.t("currentValue"),
            format_currency(performance.current_value),
        ),
        (
            locale.t("totalReturn"),
            signed(
                performance.total_return,
                format_currency(performance.total_return),
            ),
        ),
        (
            locale.t("overallPortfolioReturn"),
            signed(
                performance.total_return_percentage,
                format_percentage(performance.total_return_percentage),
            ),
        ),
    ];
    for (label, value) in lines {
        output.push_str(&format!("{:<24} {}\n", format!("{label}:").bold(), value));
    }

    if performance.stocks.is_empty() {
        return output;
    }

    output.push_str(&format!(
        "\n{}\n",
        locale.t("individualStockPerformance").cyan().bold()
    ));

    let mut builder = Builder::default();
    builder.push_record([
        locale.t("stockSymbol"),
        locale.t("percentage"),
        locale.t("initialValue"),
        locale.t("currentValue"),
        locale.t("totalReturn"),
        locale.t("returnPercentage"),
    ]);
    for stock in &performance.stocks {
        builder.push_record([
            stock.symbol.clone(),
            format_allocation(stock.allocation),
            format_currency(stock.initial_value),
            format_currency(stock.current_value),
            signed(stock.return_value, format_currency(stock.return_value)),
            signed(
                stock.return_percentage,
                format_percentage(stock.return_percentage),
            ),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

/// Allocation shares and return bars as text bars.
pub fn render_charts(locale: &Locale, charts: &PerformanceCharts) -> String {
    const WIDTH: f64 = 40.0;
    let mut output = format!("\n{}\n", locale.t("allocationChart").cyan().bold());
    for slice in &charts.allocation {
        let len = (slice.allocation / 100.0 * WIDTH).round() as usize;
        output.push_str(&format!(
            "{:<8} {:<40} {}\n",
            slice.symbol,
            "█".repeat(len),
            format_allocation(slice.allocation)
        ));
    }

    output.push_str(&format!("\n{}\n", locale.t("performanceChart").cyan().bold()));
    let max = charts
        .returns
        .iter()
        .map(|b| b.return_percentage.abs())
        .fold(0.0_f64, f64::max);
    for bar in &charts.returns {
        let len = if max > 0.0 {
            (bar.return_percentage.abs() / max * WIDTH).round() as usize
        } else {
            0
        };
        // pad before colouring, escape codes would count toward the width
        let cell = format!("{:<40}", "█".repeat(len));
        output.push_str(&format!(
            "{:<8} {} {}\n",
            bar.symbol,
            signed(bar.return_percentage, cell),
            signed(bar.return_percentage, format_percentage(bar.return_percentage))
        ));
    }
    output
}

/// History list table, in the order the store returned.
pub fn render_history(locale: &Locale, records: &[PortfolioPerformance]) -> String {
    let mut output = format!("\n{}\n", locale.t("historicalQueries").cyan().bold());
    if records.is_empty() {
        output.push_str(locale.t("noData"));
        output.push('\n');
        return output;
    }

    let mut builder = Builder::default();
    builder.push_record([
        "#",
        locale.t("clientName"),
        locale.t("startDate"),
        locale.t("initialBalance"),
        locale.t("currentValue"),
        locale.t("returnPercentage"),
        locale.t("timestamp"),
    ]);
    for record in records {
        builder.push_record([
            record.id.map(|id| id.to_string()).unwrap_or_default(),
            record.client_name.clone(),
            record.start_date.to_string(),
            format_currency(record.initial_balance),
            format_currency(record.current_value),
            signed(
                record.total_return_percentage,
                format_percentage(record.total_return_percentage),
            ),
            record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.modify(Columns::new(3..6), Alignment::right());
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

/// Allowed start-date range, shortcuts and an optional resolved date.
pub fn render_dates(
    locale: &Locale,
    bounds: (chrono::NaiveDate, chrono::NaiveDate),
    suggestions: &DateSuggestions,
    resolved: Option<(chrono::NaiveDate, chrono::NaiveDate)>,
) -> String {
    let mut output = format!(
        "{:<24} {} … {}\n",
        format!("{}:", locale.t("dateRange")).bold(),
        bounds.0,
        bounds.1
    );
    output.push_str(&format!("{}:\n", locale.t("dateSuggestions").bold()));
    for (label, date) in [
        ("oneMonthAgo", suggestions.one_month),
        ("threeMonthsAgo", suggestions.three_months),
        ("sixMonthsAgo", suggestions.six_months),
    ] {
        output.push_str(&format!("  {:<22} {}\n", locale.t(label), date));
    }
    if let Some((requested, trading)) = resolved {
        output.push_str(&format!("{requested} → {trading}\n"));
    }
    output
}
