/// ASCII chart visualization for terminal output
/// Renders prey counts per family as horizontal bars, one panel per family

use crate::core::summary::{family_totals, PreySummary};
use colored::*;

/// ASCII bar chart for terminal display
pub struct AsciiBarChart {
    title: String,
    data: Vec<(String, f64)>,
    width: usize,
    unit: Option<String>,
}

impl AsciiBarChart {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            data: Vec::new(),
            width: 50,
            unit: None,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Print values as whole numbers followed by `unit` instead of percentages
    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn add_bar(&mut self, label: &str, value: f64) {
        self.data.push((label.to_string(), value));
    }

    pub fn render(&self) -> String {
        self.render_scaled(None)
    }

    /// Render with bars scaled against `max` instead of this chart's own maximum
    pub fn render_scaled(&self, max: Option<f64>) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title.bold().cyan()));
        output.push_str(&"─".repeat(self.width + 20));
        output.push('\n');

        if self.data.is_empty() {
            return output;
        }

        let max_value = max.unwrap_or_else(|| self.data.iter().map(|(_, v)| *v).fold(0.0, f64::max));

        let max_label_len = self.data.iter().map(|(l, _)| l.len()).max().unwrap_or(10);

        for (label, value) in &self.data {
            let bar_width = if max_value > 0.0 {
                (((value / max_value) * self.width as f64) as usize).min(self.width)
            } else {
                0
            };

            let bar = "█".repeat(bar_width);
            let padding = " ".repeat(self.width - bar_width);
            let formatted_label = format!("{:width$}", label, width = max_label_len);

            let value_text = match &self.unit {
                Some(unit) => format!("{} {}", *value as usize, unit),
                None => format!("{:.1}%", value),
            };

            output.push_str(&format!(
                "{} │{}{} {}\n",
                formatted_label.yellow(),
                bar.green(),
                padding,
                value_text
            ));
        }

        output
    }
}

/// One panel per family, bars on a shared scale so panels compare directly
pub fn create_prey_chart(summaries: &[PreySummary]) -> String {
    let shared_max = summaries.iter().map(|s| s.count).max().unwrap_or(0) as f64;
    let mut output = String::new();

    for (family, total) in family_totals(summaries) {
        let mut chart = AsciiBarChart::new(&format!("== {} ({} observations) ==", family, total))
            .with_width(40)
            .with_unit("obs");
        for s in summaries.iter().filter(|s| s.family == family) {
            chart.add_bar(&s.prey, s.count as f64);
        }
        output.push_str(&chart.render_scaled(Some(shared_max)));
    }

    output
}
