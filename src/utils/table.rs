use crate::models::SummaryStats;

/// Plain-text table with padded columns, used for refresh summaries in the log
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths = headers.iter().map(|h| h.chars().count()).collect();
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            headers,
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Add a row; cells past the header count are dropped
    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, col) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(col.chars().count());
            }
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());

        for row in &self.rows {
            output.push('\n');
            output.push_str(&self.render_row(row));
        }

        output
    }

    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = row
            .iter()
            .zip(&self.col_widths)
            .map(|(col, &width)| format!("{:<width$}", col, width = width))
            .collect();
        cells.join(" | ").trim_end().to_string()
    }

    fn render_separator(&self) -> String {
        let dashes: Vec<String> = self.col_widths.iter().map(|&w| "-".repeat(w)).collect();
        dashes.join("-+-")
    }
}

fn cell(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, suffix),
        None => "-".to_string(),
    }
}

/// One line per series with every computed statistic
pub fn stats_table(stats: &[SummaryStats]) -> Table {
    let mut table = Table::new(vec!["Series", "Latest", "Step", "Total", "Mean", "Sum"]);
    for s in stats {
        table.add_row(vec![
            s.series_label.clone(),
            format!("{:.2}", s.latest_value),
            cell(s.last_step_change_pct, "%"),
            cell(s.total_change_pct, "%"),
            cell(s.mean, ""),
            cell(s.sum, ""),
        ]);
    }
    table
}
