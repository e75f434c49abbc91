//! Plain-text views: loading placeholder, error view and the card grid.

use forecast_core::DayView;

const CARD_WIDTH: usize = 18;
const GAP: &str = "  ";

pub fn loading() -> String {
    "Loading...".to_string()
}

pub fn error(reason: &str) -> String {
    format!("Error: {reason}")
}

/// 1, 2, 3 or 7 cards per row, stepping up as the terminal widens.
pub fn columns_for_width(width: usize) -> usize {
    let card = CARD_WIDTH + GAP.len();
    match width {
        w if w >= card * 7 => 7,
        w if w >= card * 3 => 3,
        w if w >= card * 2 => 2,
        _ => 1,
    }
}

fn fit(text: &str) -> String {
    if text.chars().count() <= CARD_WIDTH {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(CARD_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn card_lines(day: &DayView) -> [String; 5] {
    [
        day.weekday_label.clone(),
        day.date_label.clone(),
        format!("{} {}", day.category.icon(), day.description),
        format!("{} / {}", day.high_label(), day.low_label()),
        format!("Precip {}", day.precipitation_label()),
    ]
}

pub fn grid(title: &str, days: &[DayView], width: usize) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push('\n');

    if days.is_empty() {
        out.push_str("No forecast days returned.\n");
        return out;
    }

    let columns = columns_for_width(width);
    for row in days.chunks(columns) {
        out.push('\n');
        let cards: Vec<[String; 5]> = row.iter().map(card_lines).collect();
        for line in 0..5 {
            let cells: Vec<String> = cards
                .iter()
                .map(|c| format!("{:<width$}", fit(&c[line]), width = CARD_WIDTH))
                .collect();
            out.push_str(cells.join(GAP).trim_end());
            out.push('\n');
        }
    }

    out
}
