mod tables;
mod charts;

pub use tables::{
    format_projection_table, print_projection_table,
    format_climate_table, print_climate_table,
    format_comparison_table, print_comparison_table,
    format_species_list, print_species_list,
};
pub use charts::{
    format_cumulative_chart, print_cumulative_chart,
    format_comparison_chart, print_comparison_chart,
};
