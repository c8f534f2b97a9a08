//! Interactive image labeling tool.
//!
//! Walks a folder of images one at a time. The user types a label and
//! presses Enter (or "Save Label"); the record is appended to a
//! tab-separated file and the session advances. "Skip" advances without
//! writing anything.

use std::sync::Arc;

use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, row, text, text_input};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

use imgprep::imaging::load::{self, LoadedImage};
use imgprep::labels::{LabelRecord, LabelWriter};
use imgprep::state::config::{self, ToolConfig};
use imgprep::state::session::Session;

const TOOL: &str = "labeler";

/// Main application state
struct Labeler {
    config: ToolConfig,
    /// Traversal over the image folder; `None` only when startup failed
    session: Option<Session>,
    /// The image currently on screen
    current: Option<Arc<LoadedImage>>,
    /// iced handle for the preview pixels of `current`
    preview_handle: Option<Handle>,
    /// Text entry contents for the current image
    draft: String,
    /// Append-only writer for the label file
    writer: Option<LabelWriter>,
    /// Status line: "Image i/N: name"
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Background load of the current image finished
    Loaded(Result<Arc<LoadedImage>, String>),
    /// User edited the label entry
    DraftChanged(String),
    /// User committed the label (button or Enter)
    SaveLabel,
    /// User skipped the image without labeling it
    Skip,
}

impl Labeler {
    /// Resolve the folder and label file, scan and kick off the first load.
    fn new() -> (Self, Task<Message>) {
        let mut app = Labeler {
            config: ToolConfig::load(TOOL),
            session: None,
            current: None,
            preview_handle: None,
            draft: String::new(),
            writer: None,
            status: String::new(),
        };

        let folder = config::folder_from_args()
            .or_else(|| app.config.image_folder.clone())
            .or_else(|| {
                FileDialog::new()
                    .set_title("Select Folder with Images to Label")
                    .pick_folder()
            });

        let Some(folder) = folder else {
            app.status = "No image folder selected.".to_string();
            return (app, close_after_notice("No image folder selected."));
        };

        match Session::scan(&folder) {
            Ok(session) if !session.is_empty() => {
                let label_file = app.config.label_file_for(session.folder());
                log::info!("appending labels to {}", label_file.display());
                app.writer = Some(LabelWriter::new(label_file));

                app.config.image_folder = Some(folder);
                if let Err(e) = app.config.save(TOOL) {
                    log::warn!("{e}");
                }
                app.session = Some(session);
                let task = app.load_current();
                (app, task)
            }
            Ok(_) => {
                app.status = format!("No images found in {}", folder.display());
                let notice = app.status.clone();
                (app, close_after_notice(&notice))
            }
            Err(e) => {
                app.status = e.to_string();
                let notice = app.status.clone();
                (app, close_after_notice(&notice))
            }
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(Ok(image)) => {
                let (w, h) = image.preview_size();
                self.preview_handle = Some(Handle::from_rgba(w, h, image.preview.clone().into_raw()));
                self.current = Some(image);
                Task::none()
            }
            Message::Loaded(Err(e)) => {
                // Unreadable image: warn once, skip it and keep going
                log::warn!("skipping unreadable image: {e}");
                warning_dialog("Error", &e);
                if let Some(session) = &mut self.session {
                    session.advance();
                }
                self.load_current()
            }
            Message::DraftChanged(draft) => {
                self.draft = draft;
                Task::none()
            }
            Message::SaveLabel => {
                let Some(image) = &self.current else {
                    return Task::none();
                };
                let Some(writer) = &self.writer else {
                    return Task::none();
                };

                let record = LabelRecord::new(image.name.clone(), &self.draft);
                match writer.append(&record) {
                    Ok(()) => {
                        self.draft.clear();
                        if let Some(session) = &mut self.session {
                            session.advance();
                        }
                        self.load_current()
                    }
                    Err(e) => {
                        // Append failure aborts the commit; the session stays put
                        log::error!("label commit failed: {e}");
                        warning_dialog("Error", &e.to_string());
                        Task::none()
                    }
                }
            }
            Message::Skip => {
                self.draft.clear();
                if let Some(session) = &mut self.session {
                    session.advance();
                }
                self.load_current()
            }
        }
    }

    /// Load the image under the cursor, or finish the session.
    fn load_current(&mut self) -> Task<Message> {
        let Some(session) = &self.session else {
            return Task::none();
        };

        match session.current() {
            Some(current) => {
                self.status = session.status_line();
                let (max_w, max_h) = (self.config.max_width, self.config.max_height);
                Task::perform(
                    async move { load::load(current.path, max_w, max_h).await.map(Arc::new) },
                    Message::Loaded,
                )
            }
            None => {
                self.current = None;
                self.preview_handle = None;
                self.status = session.status_line();
                log::info!("session exhausted");
                close_after_notice("All images have been labeled.")
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let content: Element<Message> = match (&self.current, &self.preview_handle) {
            (Some(current), Some(handle)) => {
                let (w, h) = current.preview_size();

                let preview = image(handle.clone())
                    .width(Length::Fixed(w as f32))
                    .height(Length::Fixed(h as f32));

                let entry = text_input("Label for this image", &self.draft)
                    .on_input(Message::DraftChanged)
                    .on_submit(Message::SaveLabel)
                    .padding(10)
                    .width(Length::Fixed(400.0));

                let controls = row![
                    button("Save Label").on_press(Message::SaveLabel).padding(10),
                    button("Skip").on_press(Message::Skip).padding(10),
                ]
                .spacing(10);

                column![
                    preview,
                    entry,
                    controls,
                    text(&self.status).size(16),
                ]
                .spacing(15)
                .align_x(Alignment::Center)
                .into()
            }
            _ => text(&self.status).size(16).into(),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .padding(20)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Show a modal notice and close the window.
fn close_after_notice(description: &str) -> Task<Message> {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title("Image Labeling Tool")
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();

    iced::window::get_latest().and_then(iced::window::close)
}

fn warning_dialog(title: &str, description: &str) {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Image Labeling Tool", Labeler::update, Labeler::view)
        .theme(Labeler::theme)
        .window_size(iced::Size::new(700.0, 820.0))
        .centered()
        .run_with(Labeler::new)
}
