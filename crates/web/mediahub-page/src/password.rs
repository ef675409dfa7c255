//! Show/hide toggle for password fields
//!
//! Markup contract: the toggle button directly follows its password input and
//! wraps an icon glyph.
//!
//! ```html
//! <input type="password" name="password">
//! <button type="button" onclick="togglePassword(this)"><i class="fa fa-eye"></i></button>
//! ```

use tracing::debug;

use crate::config::PageConfig;
use crate::error::{PageError, PageResult};
use crate::page::Page;

/// Masking mode of a password input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMode {
    Masked,
    Plain,
}

impl PasswordMode {
    fn from_input_type(input_type: Option<&str>) -> Self {
        match input_type {
            Some("password") => Self::Masked,
            _ => Self::Plain,
        }
    }

    fn input_type(&self) -> &'static str {
        match self {
            Self::Masked => "password",
            Self::Plain => "text",
        }
    }

    fn toggled(&self) -> Self {
        match self {
            Self::Masked => Self::Plain,
            Self::Plain => Self::Masked,
        }
    }
}

/// Flip the input before `button` between masked and plain text, swapping
/// the button icon to match. Returns the new mode.
pub fn toggle_password<P: Page + ?Sized>(
    page: &P,
    config: &PageConfig,
    button: &P::Element,
) -> PageResult<PasswordMode> {
    let input = page
        .previous_element_sibling(button)
        .ok_or_else(|| PageError::element_missing("password input before toggle button"))?;
    let icon = page
        .first_descendant_by_tag(button, &config.password_icon_tag)
        .ok_or_else(|| PageError::element_missing("icon inside password toggle button"))?;

    let current = PasswordMode::from_input_type(page.attribute(&input, "type").as_deref());
    let next = current.toggled();

    page.set_attribute(&input, "type", next.input_type())?;
    match next {
        PasswordMode::Plain => {
            page.remove_class(&icon, &config.icon_masked_class)?;
            page.add_class(&icon, &config.icon_plain_class)?;
        }
        PasswordMode::Masked => {
            page.remove_class(&icon, &config.icon_plain_class)?;
            page.add_class(&icon, &config.icon_masked_class)?;
        }
    }

    debug!(mode = ?next, "Password visibility toggled");
    Ok(next)
}
