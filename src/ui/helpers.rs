use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested
/// percent of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error. The last
/// link in an anyhow chain is the root cause, which reads better in the
/// footer than the full context stack.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Format a skein weight for display, trimming a trailing `.0` so whole-gram
/// weights read naturally ("400g" instead of "400.0g").
pub(crate) fn format_grams(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{}g", weight as i64)
    } else {
        format!("{weight}g")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_grams_trims_whole_numbers() {
        assert_eq!(format_grams(400.0), "400g");
        assert_eq!(format_grams(50.5), "50.5g");
    }
}
