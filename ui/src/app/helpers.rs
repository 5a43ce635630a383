use iced::Color;
use studentdesk_core::{FieldKind, FieldSpec, Record};

pub(crate) const EMPTY_CELL: &str = "-";

pub(crate) fn level_color(level: tracing::Level) -> Color {
    match level {
        tracing::Level::ERROR => Color::from_rgb8(0xe0, 0x4f, 0x4f),
        tracing::Level::WARN => Color::from_rgb8(0xe0, 0xb0, 0x4f),
        tracing::Level::INFO => Color::from_rgb8(0x3b, 0x82, 0xf6),
        tracing::Level::DEBUG => Color::from_rgb8(0x22, 0x7d, 0x64),
        tracing::Level::TRACE => Color::from_rgb8(0x6b, 0x72, 0x80),
    }
}

pub(crate) fn cell_text(record: &Record, field: &FieldSpec) -> String {
    let value = record.field_text(&field.name);
    if value.is_empty() && field.kind == FieldKind::Url {
        EMPTY_CELL.to_string()
    } else {
        value
    }
}

pub(crate) fn kind_hint(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "",
        FieldKind::Url => "https://",
        FieldKind::Tel => "0901 234 567",
        FieldKind::Number => "0-10",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studentdesk_core::{RecordId, Revision};

    #[test]
    fn empty_url_cell_shows_dash() {
        let schema = Revision::Contact.schema();
        let record = Record::new(RecordId::text("1")).with_field("Name", "An");

        let cells: Vec<String> = schema
            .fields
            .iter()
            .map(|field| cell_text(&record, field))
            .collect();
        assert_eq!(cells, vec!["An", EMPTY_CELL, ""]);
    }
}
