//! Interactive image cropping tool.
//!
//! Walks a folder of images one at a time. The user drags a rectangle over
//! the preview; "Crop & Save" maps it back to the full-resolution original,
//! crops it and saves it in place; "Next" skips without touching the file.

use std::sync::Arc;

use iced::widget::image::Handle;
use iced::widget::{button, canvas, column, container, horizontal_space, image, row, stack, text};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

use imgprep::imaging::crop::{self, CropOutcome, SelectionRect};
use imgprep::imaging::load::{self, LoadedImage};
use imgprep::state::config::{self, ToolConfig};
use imgprep::state::session::Session;
use imgprep::ui::canvas::{SelectionCanvas, SelectionEvent};

const TOOL: &str = "cropper";

/// Main application state
struct Cropper {
    config: ToolConfig,
    /// Traversal over the image folder; `None` only when startup failed
    session: Option<Session>,
    /// The image currently on screen
    current: Option<Arc<LoadedImage>>,
    /// iced handle for the preview pixels of `current`
    preview_handle: Option<Handle>,
    /// Selection dragged over the preview, in preview coordinates
    selection: Option<SelectionRect>,
    /// Status line: "Image i/N: name" plus commit feedback
    status: String,
    /// A crop commit is in flight; buttons are disabled meanwhile
    busy: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Background load of the current image finished
    Loaded(Result<Arc<LoadedImage>, String>),
    /// The selection canvas reported a drag event
    Selection(SelectionEvent),
    /// User clicked "Crop & Save"
    CropAndSave,
    /// Background crop commit finished
    CropSaved(Result<CropOutcome, String>),
    /// User clicked "Next" without cropping
    Skip,
}

impl Cropper {
    /// Resolve the folder, scan it and kick off the first load.
    fn new() -> (Self, Task<Message>) {
        let mut app = Cropper {
            config: ToolConfig::load(TOOL),
            session: None,
            current: None,
            preview_handle: None,
            selection: None,
            status: String::new(),
            busy: false,
        };

        let folder = config::folder_from_args()
            .or_else(|| app.config.image_folder.clone())
            .or_else(|| {
                FileDialog::new()
                    .set_title("Select Folder with Images to Crop")
                    .pick_folder()
            });

        let Some(folder) = folder else {
            app.status = "No image folder selected.".to_string();
            return (app, close_after_notice("No image folder selected."));
        };

        match Session::scan(&folder) {
            Ok(session) if !session.is_empty() => {
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
                self.selection = None;
                self.busy = false;
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
            Message::Selection(event) => {
                match event {
                    SelectionEvent::Started(p) => {
                        self.selection = Some(SelectionRect::new(p.x, p.y));
                    }
                    SelectionEvent::Moved(p) | SelectionEvent::Finished(p) => {
                        if let Some(selection) = &mut self.selection {
                            selection.end = (p.x, p.y);
                        }
                    }
                }
                Task::none()
            }
            Message::CropAndSave => {
                let (Some(session), Some(image)) = (&self.session, &self.current) else {
                    return Task::none();
                };

                match crop::resolve_selection(self.selection, &image.transform) {
                    Ok(region) => {
                        self.busy = true;
                        Task::perform(
                            crop::commit(session.folder().to_path_buf(), image.clone(), region),
                            Message::CropSaved,
                        )
                    }
                    Err(e) => {
                        // Validation failure: stay on this image
                        warning_dialog("Warning", &e.to_string());
                        Task::none()
                    }
                }
            }
            Message::CropSaved(Ok(outcome)) => {
                self.busy = false;
                self.selection = None;
                self.status = format!("Saved {}", outcome.saved_path.display());
                if let Some(session) = &mut self.session {
                    session.advance();
                }
                self.load_current()
            }
            Message::CropSaved(Err(e)) => {
                // Save failure aborts the commit; the session stays put
                self.busy = false;
                log::error!("crop commit failed: {e}");
                warning_dialog("Error", &e);
                Task::none()
            }
            Message::Skip => {
                self.selection = None;
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
                close_after_notice("All images have been processed.")
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let content: Element<Message> = match (&self.current, &self.preview_handle) {
            (Some(current), Some(handle)) => {
                let (w, h) = current.preview_size();
                let (w, h) = (w as f32, h as f32);

                let preview = image(handle.clone())
                    .width(Length::Fixed(w))
                    .height(Length::Fixed(h));

                let overlay: Element<SelectionEvent> = canvas(SelectionCanvas {
                    selection: self.selection,
                })
                .width(Length::Fixed(w))
                .height(Length::Fixed(h))
                .into();

                let controls = row![
                    text(&self.status).size(16),
                    horizontal_space(),
                    button("Crop & Save")
                        .on_press_maybe((!self.busy).then_some(Message::CropAndSave))
                        .padding(10),
                    button("Next")
                        .on_press_maybe((!self.busy).then_some(Message::Skip))
                        .padding(10),
                ]
                .spacing(10)
                .align_y(Alignment::Center)
                .width(Length::Fixed(w.max(400.0)));

                column![
                    stack![preview, overlay.map(Message::Selection)],
                    controls,
                ]
                .spacing(20)
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
        .set_title("Image Cropper Tool")
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

    iced::application("Image Cropper Tool", Cropper::update, Cropper::view)
        .theme(Cropper::theme)
        .window_size(iced::Size::new(760.0, 780.0))
        .centered()
        .run_with(Cropper::new)
}
