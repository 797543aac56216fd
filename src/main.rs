use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, text, Image};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;

mod convert;
mod state;

use convert::{backend, compress, download, ConvertError};
use state::data::EncodedImage;
use state::workflow::{Stage, Workflow};

/// Main application state
struct AnimeStudio {
    /// The upload → convert → download state machine
    workflow: Workflow,
    /// Cached widget handle for the compressed original
    original_preview: Option<Handle>,
    /// Cached widget handle for the converted result
    converted_preview: Option<Handle>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Choose Photo" button
    ChoosePhoto,
    /// Background compression finished
    PhotoCompressed(Result<EncodedImage, ConvertError>),
    /// User clicked the "Convert" button
    Convert,
    /// The backend answered; the ticket tells stale replies apart
    ConversionFinished(u64, Result<EncodedImage, ConvertError>),
    /// User clicked the "Download" button
    Download,
    /// User clicked the "Start Over" button
    Reset,
}

const READY_STATUS: &str = "Ready. Choose a photo to begin.";

impl AnimeStudio {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        println!("🎨 Anime Portrait Studio starting up");

        (
            AnimeStudio {
                workflow: Workflow::new(),
                original_preview: None,
                converted_preview: None,
                status: READY_STATUS.to_string(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ChoosePhoto => {
                // The button is disabled while converting; keep the
                // guard anyway so a queued click cannot slip through.
                if self.workflow.is_converting() {
                    return Task::none();
                }

                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Choose a Photo")
                    .add_filter("Images", &["jpg", "jpeg", "png", "webp", "bmp", "gif"])
                    .pick_file();

                if let Some(path) = file {
                    self.status = format!("Compressing {}...", path.display());

                    return Task::perform(
                        compress::compress_file(path),
                        Message::PhotoCompressed,
                    );
                }

                Task::none()
            }
            Message::PhotoCompressed(Ok(image)) => {
                self.original_preview = Some(Handle::from_bytes(image.data().to_vec()));
                self.converted_preview = None;
                self.workflow.accept_upload(image);
                self.status = "Photo ready. Convert it to anime!".to_string();

                Task::none()
            }
            Message::PhotoCompressed(Err(error)) => {
                // State is untouched; the user can simply pick another file
                eprintln!("⚠️  {}", error);
                self.status = error.to_string();

                Task::none()
            }
            Message::Convert => match self.workflow.begin_conversion() {
                Ok((original, ticket)) => {
                    // The workflow already dropped any previous result
                    self.converted_preview = None;
                    self.status = "Converting... this can take a minute.".to_string();

                    Task::perform(backend::convert_image(original), move |result| {
                        Message::ConversionFinished(ticket, result)
                    })
                }
                Err(message) => {
                    self.status = message;
                    Task::none()
                }
            },
            Message::ConversionFinished(ticket, Ok(image)) => {
                let preview = Handle::from_bytes(image.data().to_vec());

                if self.workflow.complete_conversion(ticket, image) {
                    self.converted_preview = Some(preview);
                    self.status = "✅ Conversion complete!".to_string();
                } else {
                    // The workflow was reset (or superseded) while this
                    // reply was on the wire
                    println!("🗑️  Discarded stale conversion reply");
                }

                Task::none()
            }
            Message::ConversionFinished(ticket, Err(error)) => {
                if self.workflow.fail_conversion(ticket) {
                    eprintln!("⚠️  {}", error);
                    self.status = error.to_string();
                } else {
                    println!("🗑️  Discarded stale conversion failure");
                }

                Task::none()
            }
            Message::Download => {
                // No-op unless a converted result exists
                if let Some(image) = self.workflow.converted() {
                    match download::save_converted(image) {
                        Ok(Some(path)) => {
                            self.status = format!("💾 Saved to {}", path.display());
                        }
                        Ok(None) => {
                            // Dialog cancelled, nothing to report
                        }
                        Err(message) => {
                            eprintln!("⚠️  {}", message);
                            self.status = message;
                        }
                    }
                }

                Task::none()
            }
            Message::Reset => {
                self.workflow.reset();
                self.original_preview = None;
                self.converted_preview = None;
                self.status = READY_STATUS.to_string();

                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let stage = self.workflow.stage();
        let converting = self.workflow.is_converting();

        let comparison = row![
            photo_pane("Original", self.original_preview.as_ref(), "No photo selected"),
            photo_pane("Anime", self.converted_preview.as_ref(), "Not converted yet"),
        ]
        .spacing(20)
        .height(Length::Fill);

        let choose = button("Choose Photo")
            .on_press_maybe((!converting).then_some(Message::ChoosePhoto))
            .padding(10);

        let convert_label = if converting { "Converting..." } else { "Convert to Anime" };
        let can_convert = matches!(stage, Stage::Uploaded | Stage::Converted);
        let convert = button(convert_label)
            .on_press_maybe(can_convert.then_some(Message::Convert))
            .padding(10);

        let save = button("Download")
            .on_press_maybe((stage == Stage::Converted).then_some(Message::Download))
            .padding(10);

        let reset = button("Start Over")
            .on_press_maybe((stage != Stage::Empty).then_some(Message::Reset))
            .padding(10);

        let actions = row![choose, convert, save, reset].spacing(10);

        let content = column![
            text("Anime Portrait Studio").size(36),
            comparison,
            actions,
            text(&self.status).size(16),
        ]
        .spacing(20)
        .padding(30)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// One half of the before/after comparison view
fn photo_pane<'a>(
    title: &'a str,
    preview: Option<&Handle>,
    placeholder: &'a str,
) -> Element<'a, Message> {
    let body: Element<Message> = match preview {
        Some(handle) => Image::new(handle.clone()).width(Length::Fill).into(),
        None => text(placeholder).size(14).into(),
    };

    column![
        text(title).size(18),
        container(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    ]
    .spacing(10)
    .align_x(Alignment::Center)
    .width(Length::Fill)
    .into()
}

fn main() -> iced::Result {
    iced::application(
        "Anime Portrait Studio",
        AnimeStudio::update,
        AnimeStudio::view,
    )
    .theme(AnimeStudio::theme)
    .centered()
    .run_with(AnimeStudio::new)
}
