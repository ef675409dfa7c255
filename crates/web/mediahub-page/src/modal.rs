//! Modal dialogs, including the video player modal

use std::rc::Rc;

use tracing::{debug, error};

use crate::config::PageConfig;
use crate::error::PageResult;
use crate::page::{EventKind, Page};

/// Visibility of a modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Hidden,
    Shown,
}

/// Current state of a modal element. Modals start hidden.
pub fn modal_state<P: Page + ?Sized>(page: &P, modal: &P::Element) -> ModalState {
    match page.style(modal, "display").as_deref() {
        None | Some("") | Some("none") => ModalState::Hidden,
        Some(_) => ModalState::Shown,
    }
}

/// Show the modal with the given id.
///
/// For the video player modal, a non-empty `video_source` is loaded into the
/// embedded video and playback starts.
pub fn open_modal<P: Page + ?Sized>(
    page: &P,
    config: &PageConfig,
    id: &str,
    video_source: Option<&str>,
) -> PageResult<()> {
    let Some(modal) = page.element_by_id(id) else {
        debug!(modal = id, "open ignored, no such modal");
        return Ok(());
    };

    page.set_style(&modal, "display", &config.modal_display)?;

    if config.is_video_modal(id) {
        if let Some(source) = video_source.filter(|s| !s.is_empty()) {
            if let Some(video) = page.first_descendant_by_tag(&modal, &config.video_tag) {
                page.set_media_source(&video, source)?;
                page.play_media(&video)?;
            }
        }
    }

    Ok(())
}

/// Hide the modal with the given id.
///
/// Closing the video player modal pauses the video and drops its source so
/// it stops buffering in the background.
pub fn close_modal<P: Page + ?Sized>(page: &P, config: &PageConfig, id: &str) -> PageResult<()> {
    let Some(modal) = page.element_by_id(id) else {
        debug!(modal = id, "close ignored, no such modal");
        return Ok(());
    };

    page.set_style(&modal, "display", "none")?;

    if config.is_video_modal(id) {
        if let Some(video) = page.first_descendant_by_tag(&modal, &config.video_tag) {
            page.pause_media(&video)?;
            page.clear_media_source(&video)?;
        }
    }

    Ok(())
}

/// Close a modal whenever a click lands directly on its backdrop.
pub fn install_backdrop_dismiss<P>(page: &Rc<P>, config: &Rc<PageConfig>) -> PageResult<()>
where
    P: Page + 'static,
{
    let handler_page = Rc::clone(page);
    let config = Rc::clone(config);

    page.listen_window(
        EventKind::Click,
        Box::new(move |event| {
            let Some(target) = event.target() else {
                return;
            };
            if !handler_page.has_class(target, &config.modal_class) {
                return;
            }
            let id = handler_page.element_id(target);
            if let Err(e) = close_modal(handler_page.as_ref(), &config, &id) {
                error!(modal = %id, "Failed to close modal: {}", e);
            }
        }),
    )
}
