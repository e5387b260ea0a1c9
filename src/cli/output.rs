//! Output formatting for CLI

use crate::pipeline::RunSummary;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a percentage already scaled to `[0, 100]`
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

pub fn print_run_summary(summary: &RunSummary) {
    print_kv("Trials", &format_number(summary.trials));
    print_kv(
        "Successes",
        &format!(
            "{} ({})",
            format_number(summary.successes),
            format_percent(summary.success_rate)
        ),
    );
    print_kv("Arrivals", &format_number(summary.destinations_reached));
    print_kv("Mean net reward", &format!("{:.2}", summary.mean_net_reward));
    print_kv("Mean trial length", &format!("{:.1}", summary.mean_time_taken));
    print_kv("Penalties", &summary.total_penalties.to_string());
    print_kv("States seen", &format_number(summary.states_seen));
}
