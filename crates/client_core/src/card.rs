use chrono::Datelike;
use shared::domain::Event;

use crate::theme::Frame;

/// Shown in place of a field that could not be parsed.
pub const PLACEHOLDER: &str = "-";

/// `D/M/YYYY`, or the placeholder for an unparseable date.
pub fn format_date(event: &Event) -> String {
    event
        .starts_at()
        .map(|at| format!("{}/{}/{}", at.day(), at.month(), at.year()))
        .unwrap_or_else(|_| PLACEHOLDER.to_string())
}

pub fn format_price(event: &Event) -> String {
    event
        .price()
        .map(|amount| format!("${amount:.2}"))
        .unwrap_or_else(|_| PLACEHOLDER.to_string())
}

/// Summary of a single event as shown on the card page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    pub name: String,
    pub icon: Option<String>,
    pub date: String,
    pub price: String,
    pub tickets_sold: u64,
}

impl From<&Event> for EventCard {
    fn from(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            icon: event.icon.clone(),
            date: format_date(event),
            price: format_price(event),
            tickets_sold: event.tickets_sold,
        }
    }
}

impl EventCard {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        if let Some(icon) = &self.icon {
            lines.push(format!("Icon: {icon}"));
        }
        lines.push(self.date.clone());
        lines.push(format!("Price: {}", self.price));
        lines.push(format!("Tickets Sold: {}", self.tickets_sold));
        lines
    }

    pub fn render(&self, frame: Frame) -> String {
        let lines = self.lines();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let border = format!(
            "{corner}{rule}{corner}",
            corner = frame.corner,
            rule = frame.horizontal.to_string().repeat(width + 2)
        );

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        for line in &lines {
            let pad = width - line.chars().count();
            out.push_str(&format!(
                "{v} {line}{space} {v}\n",
                v = frame.vertical,
                space = " ".repeat(pad)
            ));
        }
        out.push_str(&border);
        out
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::TicketPrice;

    use super::*;
    use crate::{test_support::event, theme::Theme};

    #[test]
    fn card_formats_day_month_year_and_price() {
        let event = event(
            "1",
            "2025-03-07T18:30:00Z",
            Some(TicketPrice::Text("12.5".into())),
            31,
        );
        let card = EventCard::from(&event);
        assert_eq!(card.date, "7/3/2025");
        assert_eq!(card.price, "$12.50");
        assert_eq!(card.tickets_sold, 31);
    }

    #[test]
    fn malformed_fields_render_as_placeholder() {
        let event = event("1", "tomorrow-ish", Some(TicketPrice::Text("TBD".into())), 0);
        let card = EventCard::from(&event);
        assert_eq!(card.date, PLACEHOLDER);
        assert_eq!(card.price, PLACEHOLDER);
    }

    #[test]
    fn rendered_card_is_boxed_with_aligned_edges() {
        let card = EventCard::from(&event("1", "2025-01-01", None, 3));
        let rendered = card.render(Theme::Light.frame());
        let widths: Vec<usize> = rendered.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{rendered}");
        assert!(rendered.contains("| Event 1"));
        assert!(rendered.contains("Tickets Sold: 3"));
    }
}
