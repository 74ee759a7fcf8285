//! Root view: URL entry, cascading selectors, output folder, log console

use crate::catalog::ContentKind;
use crate::gui::app::{Message, TubeloadApp};
use crate::gui::theme;
use iced::widget::{
    button, column, container, pick_list, row, scrollable, text, text_input, Space,
};
use iced::{Alignment, Element, Length};

/// Id of the log scrollable so updates can snap it to the newest line
pub fn log_scroll_id() -> scrollable::Id {
    scrollable::Id::new("download-log")
}

pub fn root(app: &TubeloadApp) -> Element<'static, Message> {
    let form = container(
        column![
            text("Download Video or Audio")
                .size(26)
                .style(iced::theme::Text::Color(theme::GRAY_800)),
            url_row(app),
            selector_row(app),
            output_row(app),
            action_row(app),
        ]
        .spacing(18),
    )
    .padding(24)
    .width(Length::Fill)
    .style(iced::theme::Container::Custom(Box::new(
        theme::GlassContainer,
    )));

    let content = column![form, log_panel(app)]
        .spacing(20)
        .padding(24)
        .width(Length::Fill)
        .height(Length::Fill);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(
            theme::MainGradientContainer,
        )))
        .into()
}

fn url_row(app: &TubeloadApp) -> Element<'static, Message> {
    row![
        text_input("Paste video URL here...", &app.url_input)
            .on_input(Message::UrlInputChanged)
            .on_submit(Message::FetchPressed)
            .padding(12)
            .width(Length::Fill)
            .style(iced::theme::TextInput::Custom(Box::new(theme::InputStyle))),
        button(text("Paste").size(14))
            .on_press(Message::PasteFromClipboard)
            .padding([8, 12])
            .style(iced::theme::Button::Custom(Box::new(theme::IconButton))),
        button(text("Clear").size(14))
            .on_press(Message::ClearUrlInput)
            .padding([8, 12])
            .style(iced::theme::Button::Custom(Box::new(theme::IconButton))),
        button(text(if app.is_fetching { "Fetching..." } else { "Fetch" }).size(14))
            .on_press_maybe(
                (app.backend.is_some() && !app.is_fetching).then_some(Message::FetchPressed)
            )
            .padding([8, 16])
            .style(iced::theme::Button::Custom(Box::new(
                theme::SecondaryButton
            ))),
    ]
    .spacing(10)
    .align_items(Alignment::Center)
    .into()
}

fn selector_row(app: &TubeloadApp) -> Element<'static, Message> {
    let kind_column = column![
        text("Download As")
            .size(11)
            .style(iced::theme::Text::Color(theme::GRAY_500)),
        pick_list(
            ContentKind::ALL.to_vec(),
            Some(app.selection.content_kind()),
            Message::ContentKindSelected,
        )
        .text_size(14)
        .padding([6, 10])
        .width(Length::Fixed(120.0)),
    ]
    .spacing(4);

    let format_column = column![
        text("Format")
            .size(11)
            .style(iced::theme::Text::Color(theme::GRAY_500)),
        pick_list(
            app.selection.container_options(),
            app.selection.container_format().map(str::to_string),
            Message::ContainerFormatSelected,
        )
        .placeholder("-")
        .text_size(14)
        .padding([6, 10])
        .width(Length::Fixed(140.0)),
    ]
    .spacing(4);

    let quality_column = column![
        text("Resolution / Quality")
            .size(11)
            .style(iced::theme::Text::Color(theme::GRAY_500)),
        pick_list(
            app.selection.quality_options(),
            app.selection.quality_label().map(str::to_string),
            Message::QualitySelected,
        )
        .placeholder("-")
        .text_size(14)
        .padding([6, 10])
        .width(Length::Fixed(160.0)),
    ]
    .spacing(4);

    row![kind_column, format_column, quality_column]
        .spacing(16)
        .into()
}

fn output_row(app: &TubeloadApp) -> Element<'static, Message> {
    let folder_column = column![
        text("Output Folder")
            .size(11)
            .style(iced::theme::Text::Color(theme::GRAY_500)),
        text_input("Choose a folder...", &app.output_dir)
            .on_input(Message::OutputDirChanged)
            .padding(10)
            .width(Length::Fill)
            .style(iced::theme::TextInput::Custom(Box::new(theme::InputStyle))),
    ]
    .spacing(4)
    .width(Length::Fill);

    row![
        folder_column,
        button(text("Browse").size(14))
            .on_press(Message::BrowseOutputDir)
            .padding([8, 16])
            .style(iced::theme::Button::Custom(Box::new(
                theme::SecondaryButton
            ))),
    ]
    .spacing(10)
    .align_items(Alignment::End)
    .into()
}

fn action_row(app: &TubeloadApp) -> Element<'static, Message> {
    row![
        text(app.status_message.clone())
            .size(14)
            .style(iced::theme::Text::Color(theme::GRAY_600)),
        Space::with_width(Length::Fill),
        button(
            text(if app.is_downloading {
                "Downloading..."
            } else {
                "Download"
            })
            .size(16)
        )
        .on_press_maybe(
            (app.backend.is_some() && !app.is_downloading).then_some(Message::DownloadPressed)
        )
        .padding([12, 28])
        .style(iced::theme::Button::Custom(Box::new(theme::PrimaryButton))),
    ]
    .spacing(12)
    .align_items(Alignment::Center)
    .into()
}

fn log_panel(app: &TubeloadApp) -> Element<'static, Message> {
    let mut lines = column![].spacing(2);

    if app.log_lines.is_empty() {
        lines = lines.push(
            text("Progress will appear here.")
                .size(13)
                .style(iced::theme::Text::Color(theme::GRAY_500)),
        );
    } else {
        for line in &app.log_lines {
            lines = lines.push(
                text(line.clone())
                    .size(13)
                    .style(iced::theme::Text::Color(theme::CONSOLE_TEXT)),
            );
        }
    }

    container(
        scrollable(lines.width(Length::Fill))
            .id(log_scroll_id())
            .height(Length::Fill)
            .style(iced::theme::Scrollable::Custom(Box::new(
                theme::LogScrollable,
            ))),
    )
    .padding(14)
    .width(Length::Fill)
    .height(Length::Fixed(220.0))
    .style(iced::theme::Container::Custom(Box::new(theme::LogContainer)))
    .into()
}
