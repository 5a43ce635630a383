use iced::{Background, Border, Color, Theme};

use crate::app::types::NoticeTone;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NoticeStyle {
    pub(crate) tone: NoticeTone,
}

impl iced::widget::container::StyleSheet for NoticeStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> iced::widget::container::Appearance {
        let (background, border) = match self.tone {
            NoticeTone::Info => (
                Color::from_rgb8(0xe8, 0xf1, 0xfe),
                Color::from_rgb8(0x3b, 0x82, 0xf6),
            ),
            NoticeTone::Error => (
                Color::from_rgb8(0xfd, 0xec, 0xec),
                Color::from_rgb8(0xe0, 0x4f, 0x4f),
            ),
        };

        iced::widget::container::Appearance {
            text_color: Some(Color::from_rgb8(0x12, 0x12, 0x12)),
            background: Some(Background::Color(background)),
            border: Border {
                color: border,
                width: 1.0,
                radius: 6.0.into(),
            },
            ..iced::widget::container::Appearance::default()
        }
    }
}

/// Highlights the table row currently loaded into the form.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EditingRowStyle;

impl iced::widget::container::StyleSheet for EditingRowStyle {
    type Style = Theme;

    fn appearance(&self, style: &Self::Style) -> iced::widget::container::Appearance {
        let palette = style.extended_palette();
        iced::widget::container::Appearance {
            background: Some(Background::Color(palette.primary.weak.color)),
            text_color: Some(palette.primary.weak.text),
            border: Border {
                color: palette.primary.strong.color,
                width: 1.0,
                radius: 4.0.into(),
            },
            ..iced::widget::container::Appearance::default()
        }
    }
}
