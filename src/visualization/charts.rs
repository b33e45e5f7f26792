use colored::Colorize;

use crate::models::ProjectionResult;

const BAR_WIDTH: usize = 40;

fn bar(value: f64, max: f64) -> String {
    let len = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "\u{2588}".repeat(len)
}

/// Format a text bar chart of cumulative CO₂ over time.
pub fn format_cumulative_chart(result: &ProjectionResult) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!("Cumulative CO₂ Sequestered: {}", result.species_id)
            .bold()
            .green()
    ));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if result.points.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let max = result.total_co2_tons();
    output.push_str(&format!("  {:>6}  {:>12}  Cumulative\n", "Age", "CO₂ (t)"));
    output.push_str(&format!("  {}\n", "-".repeat(64)));

    for p in &result.points {
        output.push_str(&format!(
            "  {:>6}  {:>12.2}  {}\n",
            p.age_years,
            p.co2_cumulative_tons,
            bar(p.co2_cumulative_tons, max).green()
        ));
    }

    output.push('\n');
    output
}

/// Print a cumulative CO₂ bar chart.
pub fn print_cumulative_chart(result: &ProjectionResult) {
    print!("{}", format_cumulative_chart(result));
}

/// Format a bar chart comparing final cumulative CO₂ across species.
pub fn format_comparison_chart(results: &[ProjectionResult]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        "Total CO₂ Sequestered by Species".bold().green()
    ));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if results.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let max = results
        .iter()
        .map(ProjectionResult::total_co2_tons)
        .fold(0.0f64, f64::max);
    let label_width = results
        .iter()
        .map(|r| r.species_id.chars().count())
        .max()
        .unwrap_or(0);

    for r in results {
        let total = r.total_co2_tons();
        output.push_str(&format!(
            "  {:<label_width$}  {:>10.2} t  {}\n",
            r.species_id,
            total,
            bar(total, max).green()
        ));
    }

    output.push('\n');
    output
}

/// Print a species comparison bar chart.
pub fn print_comparison_chart(results: &[ProjectionResult]) {
    print!("{}", format_comparison_chart(results));
}
