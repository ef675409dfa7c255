//! Configuration for the page runtime
//!
//! Every element id, class name and constant the controllers rely on lives
//! here so pages with different markup can override them.

use bon::Builder;
use serde::Deserialize;

use crate::error::PageResult;

/// A drop zone element paired with the file input it feeds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DropZoneBinding {
    /// Id of the element that accepts clicks and drops
    pub zone_id: String,
    /// Id of the `<input type="file">` carrying the upload URL
    pub input_id: String,
}

impl DropZoneBinding {
    pub fn new<Z: Into<String>, I: Into<String>>(zone_id: Z, input_id: I) -> Self {
        Self {
            zone_id: zone_id.into(),
            input_id: input_id.into(),
        }
    }

    /// The zones present on the stock pages: generic files, videos and anime.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("fileDropZone", "fileInput"),
            Self::new("videoDropZone", "videoFileInput"),
            Self::new("animeDropZone", "animeFileInput"),
        ]
    }
}

/// Page runtime configuration
#[derive(Debug, Clone, PartialEq, Builder, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Id of the element that receives the star nodes
    #[builder(into, default = "stars".to_string())]
    pub star_container_id: String,

    /// Number of stars generated at startup
    #[builder(default = 150)]
    pub star_count: usize,

    /// Class applied to every star node
    #[builder(into, default = "star".to_string())]
    pub star_class: String,

    /// Marker class shared by every modal backdrop
    #[builder(into, default = "modal".to_string())]
    pub modal_class: String,

    /// Inline `display` value of an open modal
    #[builder(into, default = "flex".to_string())]
    pub modal_display: String,

    /// Id of the modal wrapping the video player
    #[builder(into, default = "videoPlayerModal".to_string())]
    pub video_modal_id: String,

    /// Tag of the media element inside the video modal
    #[builder(into, default = "video".to_string())]
    pub video_tag: String,

    /// Tag of the glyph inside a password toggle button
    #[builder(into, default = "i".to_string())]
    pub password_icon_tag: String,

    /// Icon class shown while the password is masked
    #[builder(into, default = "fa-eye".to_string())]
    pub icon_masked_class: String,

    /// Icon class shown while the password is readable
    #[builder(into, default = "fa-eye-slash".to_string())]
    pub icon_plain_class: String,

    /// Class added to a drop zone while a drag hovers over it
    #[builder(into, default = "dragover".to_string())]
    pub dragover_class: String,

    /// Attribute on the file input holding the upload destination
    #[builder(into, default = "data-upload-url".to_string())]
    pub upload_url_attribute: String,

    /// Multipart field name used for every uploaded file
    #[builder(into, default = "file".to_string())]
    pub upload_field: String,

    /// Alert text shown when an upload fails
    #[builder(into, default = "Upload failed. Please check the console and try again.".to_string())]
    pub upload_failure_message: String,

    /// `tracing` filter directive used by the browser console logger
    #[builder(into, default = "info".to_string())]
    pub log_filter: String,

    /// Drop zones wired at page-ready
    #[builder(default = DropZoneBinding::defaults())]
    pub drop_zones: Vec<DropZoneBinding>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            star_container_id: "stars".to_string(),
            star_count: 150,
            star_class: "star".to_string(),
            modal_class: "modal".to_string(),
            modal_display: "flex".to_string(),
            video_modal_id: "videoPlayerModal".to_string(),
            video_tag: "video".to_string(),
            password_icon_tag: "i".to_string(),
            icon_masked_class: "fa-eye".to_string(),
            icon_plain_class: "fa-eye-slash".to_string(),
            dragover_class: "dragover".to_string(),
            upload_url_attribute: "data-upload-url".to_string(),
            upload_field: "file".to_string(),
            upload_failure_message: "Upload failed. Please check the console and try again."
                .to_string(),
            log_filter: "info".to_string(),
            drop_zones: DropZoneBinding::defaults(),
        }
    }
}

impl PageConfig {
    /// Parse a (possibly partial) JSON override; missing keys keep their defaults.
    pub fn from_json(json: &str) -> PageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether `id` names the video player modal
    pub fn is_video_modal(&self, id: &str) -> bool {
        self.video_modal_id == id
    }
}
