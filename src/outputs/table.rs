//! Fixed-width text table of the weekly report.
//!
//! ```text
//! ------------------------------------------------
//! Начало недели | Конец недели |Популярные слова |
//! ------------------------------------------------
//! 28-12-2009    |  03-01-2010  | закон инженерия |
//! ------------------------------------------------
//! ```
//!
//! Column widths: the first column is its header plus one space, the second its
//! header plus two, the third the longest words string plus two. The first
//! column is left-aligned, the other two centered, every line ends with the
//! separator.

use crate::models::ReportProjection;
use std::fmt::Write;

/// Header labels, in column order.
pub const HEADER: [&str; 3] = ["Начало недели", "Конец недели", "Популярные слова"];

const COLUMN_SEPARATOR: char = '|';
const ROW_SEPARATOR: char = '-';

/// Widths of the three columns, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    pub week_start: usize,
    pub week_end: usize,
    pub words: usize,
}

impl ColumnWidths {
    pub fn for_projection(projection: &ReportProjection) -> Self {
        let longest_words = projection
            .iter()
            .map(|(_, words)| words.chars().count())
            .max()
            .unwrap_or_else(|| HEADER[2].chars().count());
        Self {
            week_start: HEADER[0].chars().count() + 1,
            week_end: HEADER[1].chars().count() + 2,
            words: longest_words + 2,
        }
    }

    /// Full line width including one separator per column.
    pub fn table_width(&self) -> usize {
        self.week_start + self.week_end + self.words + 3
    }
}

/// Render the whole table, one line per row, trailing newline included.
pub fn render(projection: &ReportProjection) -> String {
    let widths = ColumnWidths::for_projection(projection);
    let border: String = std::iter::repeat_n(ROW_SEPARATOR, widths.table_width()).collect();

    let mut out = String::new();
    let _ = writeln!(out, "{border}");
    let _ = writeln!(out, "{}", row(&widths, HEADER[0], HEADER[1], HEADER[2]));
    let _ = writeln!(out, "{border}");
    for (week, words) in projection.iter() {
        let _ = writeln!(
            out,
            "{}",
            row(&widths, &week.start_label(), &week.end_label(), words)
        );
    }
    let _ = writeln!(out, "{border}");
    out
}

fn row(widths: &ColumnWidths, week_start: &str, week_end: &str, words: &str) -> String {
    format!(
        "{week_start:<w0$}{sep}{week_end:^w1$}{sep}{words:^w2$}{sep}",
        w0 = widths.week_start,
        w1 = widths.week_end,
        w2 = widths.words,
        sep = COLUMN_SEPARATOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekKey;
    use chrono::NaiveDate;

    fn projection() -> ReportProjection {
        let week = |y, m, d| WeekKey::containing(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        ReportProjection::new(vec![
            (week(2000, 1, 5), "пример решение проблема".to_string()),
            (week(2010, 1, 5), "окно менеджер задача".to_string()),
        ])
    }

    #[test]
    fn test_report_column_width() {
        let widths = ColumnWidths::for_projection(&projection());
        assert_eq!(widths.week_start, "Начало недели ".chars().count());
        assert_eq!(widths.week_end, " Конец недели ".chars().count());
        assert_eq!(widths.words, " пример решение проблема ".chars().count());
        assert_eq!(widths.words, "пример решение проблема".chars().count() + 2);
        assert_eq!(widths.table_width(), 14 + 14 + 25 + 3);
    }

    #[test]
    fn test_render_layout() {
        let table = render(&projection());
        let lines: Vec<&str> = table.lines().collect();
        let border = "-".repeat(56);

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], border);
        assert_eq!(lines[1], "Начало недели | Конец недели |    Популярные слова     |");
        assert_eq!(lines[2], border);
        assert_eq!(lines[3], "03-01-2000    |  09-01-2000  | пример решение проблема |");
        assert_eq!(lines[4], "04-01-2010    |  10-01-2010  |  окно менеджер задача   |");
        assert_eq!(lines[5], border);
        for line in &lines {
            assert_eq!(line.chars().count(), 56, "{line}");
        }
    }

    #[test]
    fn test_render_empty_projection() {
        let table = render(&ReportProjection::default());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Начало недели | Конец недели | Популярные слова |");
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }
}
