use iced::alignment::Horizontal;
use iced::theme;
use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_input, Row};
use iced::{Alignment, Color, Element, Length};
use studentdesk_core::{ConsoleLevel, FieldKind, Record, CONFIRM_DELETE};

use crate::app::helpers::{cell_text, kind_hint, level_color};
use crate::app::styles::{EditingRowStyle, NoticeStyle};
use crate::app::types::{Message, NoticeTone, Tab};
use crate::app::StudentDeskApp;

const ID_PORTION: u16 = 1;
const FIELD_PORTION: u16 = 2;
const ACTIONS_PORTION: u16 = 2;

fn heading(label: impl ToString) -> Element<'static, Message> {
    text(label)
        .size(20)
        .style(theme::Text::Color(Color::from_rgb8(0x12, 0x12, 0x12)))
        .into()
}

fn caption(label: impl ToString) -> Element<'static, Message> {
    text(label)
        .size(12)
        .style(theme::Text::Color(Color::from_rgb8(0x6a, 0x6a, 0x6a)))
        .into()
}

impl StudentDeskApp {
    pub(super) fn root_view(&self) -> Element<'_, Message> {
        let header = row![
            text("Quản lý sinh viên")
                .size(28)
                .style(theme::Text::Color(Color::from_rgb8(0x10, 0x1a, 0x24))),
            caption(format!("{} · {}", self.manager.schema().name, self.collection_url)),
        ]
        .spacing(12)
        .align_items(Alignment::Center);

        let mut content = column![header, self.tab_bar()].spacing(16).padding(16);

        if let Some(notice) = self.notice_view() {
            content = content.push(notice);
        }

        let body = match self.active_tab {
            Tab::Records => self.records_tab_view(),
            Tab::Diagnostics => self.diagnostics_tab_view(),
        };
        content = content.push(body);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn tab_bar(&self) -> Element<'_, Message> {
        row![
            self.tab_button(Tab::Records, "Sinh viên"),
            self.tab_button(Tab::Diagnostics, "Chẩn đoán"),
        ]
        .spacing(8)
        .align_items(Alignment::Center)
        .into()
    }

    fn tab_button(&self, tab: Tab, label: &str) -> Element<'_, Message> {
        let style = if self.active_tab == tab {
            theme::Button::Primary
        } else {
            theme::Button::Secondary
        };

        button(text(label))
            .style(style)
            .on_press(Message::SelectTab(tab))
            .into()
    }

    fn notice_view(&self) -> Option<Element<'_, Message>> {
        let notice = self.notice.as_ref()?;
        let content = row![
            text(&notice.text).size(14).width(Length::Fill),
            button(text("Đóng").size(12))
                .style(theme::Button::Text)
                .on_press(Message::DismissNotice),
        ]
        .spacing(12)
        .align_items(Alignment::Center);

        Some(
            container(content)
                .padding(10)
                .width(Length::Fill)
                .style(theme::Container::Custom(Box::new(NoticeStyle {
                    tone: notice.tone,
                })))
                .into(),
        )
    }

    fn records_tab_view(&self) -> Element<'_, Message> {
        row![self.form_view(), self.list_view()]
            .spacing(16)
            .align_items(Alignment::Start)
            .into()
    }

    fn form_view(&self) -> Element<'_, Message> {
        let editing = self.manager.is_editing();
        let title = if editing {
            "Chỉnh sửa mục"
        } else {
            "Thêm mục mới"
        };

        let mut form = column![heading(title)].spacing(10);

        for field in &self.manager.schema().fields {
            let name = field.name.clone();
            let input = text_input(&field.placeholder(), self.manager.draft().get(&field.name))
                .on_input(move |value| Message::FieldChanged {
                    field: name.clone(),
                    value,
                })
                .on_submit(Message::Submit)
                .padding(6)
                .size(14)
                .width(Length::Fill);

            let label = if field.required {
                format!("{} *", field.label)
            } else {
                field.label.clone()
            };
            let mut label_row = row![text(label)
                .size(12)
                .style(theme::Text::Color(Color::from_rgb8(0x3a, 0x4a, 0x5a)))]
            .spacing(8);
            if field.kind != FieldKind::Text {
                label_row = label_row.push(caption(kind_hint(field.kind)));
            }

            form = form.push(column![label_row, input].spacing(4));
        }

        let submit_label = if editing { "Cập nhật" } else { "Thêm" };
        let mut buttons = row![button(text(submit_label))
            .style(theme::Button::Primary)
            .on_press(Message::Submit)]
        .spacing(8)
        .align_items(Alignment::Center);
        if editing {
            buttons = buttons.push(
                button(text("Hủy"))
                    .style(theme::Button::Secondary)
                    .on_press(Message::CancelEdit),
            );
        }
        form = form.push(buttons);

        container(form)
            .padding(12)
            .width(Length::FillPortion(1))
            .style(theme::Container::Box)
            .into()
    }

    fn list_view(&self) -> Element<'_, Message> {
        let loading = self.manager.is_loading();
        let refresh_label = if loading { "Đang tải..." } else { "Làm mới" };
        let header = row![
            container(heading(format!("Danh sách ({})", self.manager.records().len())))
                .width(Length::Fill),
            button(text(refresh_label)).on_press_maybe((!loading).then_some(Message::Refresh)),
        ]
        .spacing(12)
        .align_items(Alignment::Center);

        let mut list = column![header].spacing(10);

        if let Some(confirm) = self.confirm_view() {
            list = list.push(confirm);
        }

        if self.manager.records().is_empty() {
            list = list.push(caption("Không có dữ liệu"));
        } else {
            list = list.push(self.table_header());
            let mut rows = column![].spacing(2);
            for record in self.manager.records() {
                rows = rows.push(self.table_row(record));
            }
            list = list.push(scrollable(rows).height(Length::Fill));
        }

        container(list)
            .padding(12)
            .width(Length::FillPortion(2))
            .height(Length::Fill)
            .style(theme::Container::Box)
            .into()
    }

    fn confirm_view(&self) -> Option<Element<'_, Message>> {
        let id = self.pending_delete.as_ref()?;
        let content = row![
            text(format!("{CONFIRM_DELETE} (ID {id})"))
                .size(14)
                .width(Length::Fill),
            button(text("Xóa"))
                .style(theme::Button::Destructive)
                .on_press(Message::DeleteConfirmed),
            button(text("Hủy"))
                .style(theme::Button::Secondary)
                .on_press(Message::DeleteDeclined),
        ]
        .spacing(8)
        .align_items(Alignment::Center);

        Some(
            container(content)
                .padding(10)
                .width(Length::Fill)
                .style(theme::Container::Custom(Box::new(NoticeStyle {
                    tone: NoticeTone::Error,
                })))
                .into(),
        )
    }

    fn table_header(&self) -> Element<'_, Message> {
        let mut header = Row::new()
            .spacing(4)
            .push(header_cell("ID", ID_PORTION));
        for field in &self.manager.schema().fields {
            header = header.push(header_cell(&field.label, FIELD_PORTION));
        }
        header
            .push(header_cell("Thao tác", ACTIONS_PORTION))
            .padding([4, 6])
            .into()
    }

    fn table_row(&self, record: &Record) -> Element<'_, Message> {
        let mut cells = Row::new()
            .spacing(4)
            .align_items(Alignment::Center)
            .push(body_cell(record.id.to_string(), ID_PORTION));
        for field in &self.manager.schema().fields {
            cells = cells.push(body_cell(cell_text(record, field), FIELD_PORTION));
        }

        let actions = row![
            button(text("Sửa").size(12))
                .style(theme::Button::Secondary)
                .on_press(Message::EditRecord(record.id.clone())),
            button(text("Xóa").size(12))
                .style(theme::Button::Destructive)
                .on_press(Message::DeleteRequested(record.id.clone())),
        ]
        .spacing(6);
        cells = cells.push(container(actions).width(Length::FillPortion(ACTIONS_PORTION)));

        let line = container(cells.padding([4, 6])).width(Length::Fill);
        if self.manager.cursor().editing() == Some(&record.id) {
            line.style(theme::Container::Custom(Box::new(EditingRowStyle)))
                .into()
        } else {
            line.into()
        }
    }

    fn diagnostics_tab_view(&self) -> Element<'_, Message> {
        let level_picker = pick_list(
            &ConsoleLevel::ALL[..],
            self.log_level,
            Message::LogLevelChanged,
        )
        .placeholder("RUST_LOG");

        let copy_status = self.copy_status.as_deref().unwrap_or("Sẵn sàng");
        let controls = row![
            container(heading("Nhật ký")).width(Length::Fill),
            level_picker,
            button(text("Copy diagnostics")).on_press(Message::CopyDiagnostics),
        ]
        .spacing(12)
        .align_items(Alignment::Center);

        let mut lines = column![].spacing(4);
        for entry in &self.log_entries {
            lines = lines.push(
                text(entry.format_line())
                    .size(13)
                    .horizontal_alignment(Horizontal::Left)
                    .style(theme::Text::Color(level_color(entry.level))),
            );
        }

        let panel = column![
            controls,
            caption(format!("Clipboard: {copy_status}")),
            scrollable(lines).height(Length::Fill).width(Length::Fill),
        ]
        .spacing(10);

        container(panel)
            .padding(12)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(theme::Container::Box)
            .into()
    }
}

fn header_cell(label: &str, portion: u16) -> Element<'static, Message> {
    container(
        text(label)
            .size(13)
            .style(theme::Text::Color(Color::from_rgb8(0x3a, 0x4a, 0x5a))),
    )
    .width(Length::FillPortion(portion))
    .into()
}

fn body_cell(value: String, portion: u16) -> Element<'static, Message> {
    container(text(value).size(13))
        .width(Length::FillPortion(portion))
        .into()
}
