//! Page runtime tying the controllers to one document

use std::rc::Rc;

use rand::Rng;
use tracing::{debug, error, info};

use crate::background::populate_background;
use crate::config::PageConfig;
use crate::error::PageResult;
use crate::modal::{close_modal, install_backdrop_dismiss, open_modal};
use crate::page::Page;
use crate::password::{PasswordMode, toggle_password};
use crate::upload::{DropZone, UploadClient, setup_drop_zone};

/// Everything the page-level operations share: the document, the upload
/// client and the configuration
pub struct PageRuntime<P, C> {
    page: Rc<P>,
    client: Rc<C>,
    config: Rc<PageConfig>,
}

impl<P, C> Clone for PageRuntime<P, C> {
    fn clone(&self) -> Self {
        Self {
            page: Rc::clone(&self.page),
            client: Rc::clone(&self.client),
            config: Rc::clone(&self.config),
        }
    }
}

impl<P, C> PageRuntime<P, C>
where
    P: Page + 'static,
    C: UploadClient<Files = P::Files> + 'static,
{
    pub fn new(page: Rc<P>, client: Rc<C>, config: PageConfig) -> Self {
        Self {
            page,
            client,
            config: Rc::new(config),
        }
    }

    pub fn page(&self) -> &Rc<P> {
        &self.page
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Page-ready routine: draw the background, enable backdrop dismissal
    /// and wire every configured drop zone.
    ///
    /// Returns the drop zones that were set up. Zones missing from the page
    /// are skipped silently.
    pub fn on_ready<R: Rng + ?Sized>(&self, rng: &mut R) -> PageResult<Vec<DropZone<P::Element>>> {
        if let Err(e) = populate_background(self.page.as_ref(), &self.config, rng) {
            error!("Failed to draw star background: {}", e);
        }

        install_backdrop_dismiss(&self.page, &self.config)?;

        let mut zones = Vec::new();
        for binding in &self.config.drop_zones {
            match self.setup_drop_zone(&binding.zone_id, &binding.input_id) {
                Ok(zone) => zones.push(zone),
                Err(e) if e.is_markup() => {
                    debug!(zone = %binding.zone_id, "Drop zone skipped: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        info!(drop_zones = zones.len(), "Page ready");
        Ok(zones)
    }

    pub fn open_modal(&self, id: &str, video_source: Option<&str>) -> PageResult<()> {
        open_modal(self.page.as_ref(), &self.config, id, video_source)
    }

    pub fn close_modal(&self, id: &str) -> PageResult<()> {
        close_modal(self.page.as_ref(), &self.config, id)
    }

    pub fn toggle_password(&self, button: &P::Element) -> PageResult<PasswordMode> {
        toggle_password(self.page.as_ref(), &self.config, button)
    }

    pub fn setup_drop_zone(&self, zone_id: &str, input_id: &str) -> PageResult<DropZone<P::Element>> {
        setup_drop_zone(&self.page, &self.client, &self.config, zone_id, input_id)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::memory::MemoryPage;
    use crate::modal::{ModalState, modal_state};
    use crate::native::ReqwestUploadClient;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn runtime(page: &Rc<MemoryPage>) -> PageRuntime<MemoryPage, ReqwestUploadClient> {
        PageRuntime::new(
            Rc::clone(page),
            Rc::new(ReqwestUploadClient::new()),
            PageConfig::default(),
        )
    }

    #[test]
    fn test_ready_on_full_page() {
        let page = Rc::new(MemoryPage::new());
        let stars = page.add("div", "stars");
        for (zone, input, url) in [
            ("fileDropZone", "fileInput", "/upload/file"),
            ("videoDropZone", "videoFileInput", "/upload/video"),
            ("animeDropZone", "animeFileInput", "/upload/anime"),
        ] {
            page.add("div", zone);
            let input = page.add("input", input);
            page.set_attribute(&input, "data-upload-url", url).unwrap();
        }

        let zones = runtime(&page)
            .on_ready(&mut StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!(page.children(stars).len(), 150);
        assert_eq!(page.window_listener_count(), 1);
        let urls: Vec<_> = zones.iter().map(|z| z.upload_url.as_str()).collect();
        assert_eq!(urls, vec!["/upload/file", "/upload/video", "/upload/anime"]);
    }

    #[test]
    fn test_ready_on_sparse_page() {
        let page = Rc::new(MemoryPage::new());
        page.add("div", "videoDropZone");
        let input = page.add("input", "videoFileInput");
        page.set_attribute(&input, "data-upload-url", "/upload/video")
            .unwrap();
        page.add("div", "fileDropZone");
        page.add("input", "fileInput");

        let zones = runtime(&page)
            .on_ready(&mut StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].upload_url, "/upload/video");
    }

    #[test]
    fn test_modal_operations() {
        let page = Rc::new(MemoryPage::new());
        let modal = page.add("div", "addVideoModal");
        page.add_class(&modal, "modal").unwrap();
        let runtime = runtime(&page);
        runtime.on_ready(&mut StdRng::seed_from_u64(0)).unwrap();

        runtime.open_modal("addVideoModal", None).unwrap();
        assert_eq!(modal_state(page.as_ref(), &modal), ModalState::Shown);

        page.click(modal);
        assert_eq!(modal_state(page.as_ref(), &modal), ModalState::Hidden);
    }

    #[test]
    fn test_password_toggle() {
        let page = Rc::new(MemoryPage::new());
        let input = page.add("input", "password");
        page.set_attribute(&input, "type", "password").unwrap();
        let button = page.add("button", "");
        page.insert(button, "i", "");

        let mode = runtime(&page).toggle_password(&button).unwrap();

        assert_eq!(mode, PasswordMode::Plain);
    }
}
