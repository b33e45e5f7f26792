use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::models::{ClimateDebug, ProjectionResult, YearlyTotal};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Format a projection series as a table.
pub fn format_projection_table(result: &ProjectionResult) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!("CO₂ Projection: {}", result.species_id).bold().green()
    ));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let mut table = new_table(vec![
        "Age (yr)",
        "Trees Alive",
        "CO₂ (t/yr)",
        "Cumulative CO₂ (t)",
    ]);

    for p in &result.points {
        table.add_row(vec![
            Cell::new(p.age_years),
            Cell::new(format!("{:.0}", p.trees_alive)),
            Cell::new(format!("{:.2}", p.co2_year_tons)),
            Cell::new(format!("{:.2}", p.co2_cumulative_tons)),
        ]);
    }

    output.push_str(&format!("{table}\n"));
    output
}

/// Print a projection series table.
pub fn print_projection_table(result: &ProjectionResult) {
    print!("{}", format_projection_table(result));
}

/// Format the climate multiplier breakdown.
pub fn format_climate_table(debug: &ClimateDebug) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Climate Adjustment".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    if debug.temp_c.is_none() {
        output.push_str(&format!(
            "  {}\n",
            "Climate data unavailable; multiplier 1.00 applied.".dimmed()
        ));
        return output;
    }

    let mut table = new_table(vec!["Metric", "Value", "Unit"]);
    table.add_row(vec![
        Cell::new("Mean Annual Temperature"),
        Cell::new(opt(debug.temp_c, 1)),
        Cell::new("°C"),
    ]);
    table.add_row(vec![
        Cell::new("Mean Annual Precipitation"),
        Cell::new(opt(debug.precip_mm, 0)),
        Cell::new("mm"),
    ]);
    table.add_row(vec![
        Cell::new("Temperature Factor"),
        Cell::new(opt(debug.temp_factor, 3)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Rain Factor"),
        Cell::new(opt(debug.rain_factor, 3)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Multiplier"),
        Cell::new(format!("{:.3}", debug.multiplier)),
        Cell::new("×"),
    ]);

    output.push_str(&format!("{table}\n"));
    output
}

/// Print the climate multiplier breakdown.
pub fn print_climate_table(debug: &ClimateDebug) {
    print!("{}", format_climate_table(debug));
}

/// Format yearly CO₂ per species side by side, with the stacked total.
pub fn format_comparison_table(results: &[ProjectionResult], totals: &[YearlyTotal]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Species Comparison".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if results.is_empty() {
        output.push_str("  No species selected.\n");
        return output;
    }

    let mut header = vec!["Age (yr)"];
    header.extend(results.iter().map(|r| r.species_id.as_str()));
    header.push("Total (t/yr)");
    let mut table = new_table(header);

    for total in totals {
        let mut row = vec![Cell::new(total.age_years)];
        for result in results {
            let value = result
                .points
                .iter()
                .filter(|p| p.age_years == total.age_years)
                .map(|p| p.co2_year_tons)
                .sum::<f64>();
            row.push(Cell::new(format!("{value:.2}")));
        }
        row.push(Cell::new(format!("{:.2}", total.co2_year_tons)));
        table.add_row(row);
    }

    output.push_str(&format!("{table}\n"));
    output
}

/// Print the species comparison table.
pub fn print_comparison_table(results: &[ProjectionResult], totals: &[YearlyTotal]) {
    print!("{}", format_comparison_table(results, totals));
}

/// Format the list of available species.
pub fn format_species_list<'a>(species: impl IntoIterator<Item = &'a String>) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Available Species".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(40)));
    let mut count = 0;
    for id in species {
        output.push_str(&format!("  - {id}\n"));
        count += 1;
    }
    if count == 0 {
        output.push_str("  No species found.\n");
    }
    output
}

/// Print the list of available species.
pub fn print_species_list<'a>(species: impl IntoIterator<Item = &'a String>) {
    print!("{}", format_species_list(species));
}
