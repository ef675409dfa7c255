//! Animated star background

use rand::Rng;
use tracing::debug;

use crate::config::PageConfig;
use crate::error::PageResult;
use crate::page::Page;

/// One decorative star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Vertical position, percent of the container
    pub top: f64,
    /// Horizontal position, percent of the container
    pub left: f64,
    /// Width and height in pixels
    pub size: f64,
    /// Animation delay in seconds
    pub delay: f64,
    /// Animation duration in seconds
    pub duration: f64,
}

impl Star {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            top: rng.gen_range(0.0..100.0),
            left: rng.gen_range(0.0..100.0),
            size: rng.gen_range(0.0..3.0),
            delay: rng.gen_range(0.0..5.0),
            duration: rng.gen_range(5.0..10.0),
        }
    }

    /// Inline style declarations for the star node
    pub fn style_declarations(&self) -> [(&'static str, String); 6] {
        [
            ("top", format!("{}%", self.top)),
            ("left", format!("{}%", self.left)),
            ("width", format!("{}px", self.size)),
            ("height", format!("{}px", self.size)),
            ("animation-delay", format!("{}s", self.delay)),
            ("animation-duration", format!("{}s", self.duration)),
        ]
    }
}

/// Fill the star container with randomized stars.
///
/// Returns the number of stars added; a page without the container gets none.
pub fn populate_background<P, R>(page: &P, config: &PageConfig, rng: &mut R) -> PageResult<usize>
where
    P: Page + ?Sized,
    R: Rng + ?Sized,
{
    let Some(container) = page.element_by_id(&config.star_container_id) else {
        debug!(
            container = %config.star_container_id,
            "No star container on this page"
        );
        return Ok(0);
    };

    for _ in 0..config.star_count {
        let star = Star::random(rng);
        let node = page.create_element("div")?;
        page.add_class(&node, &config.star_class)?;
        for (property, value) in star.style_declarations() {
            page.set_style(&node, property, &value)?;
        }
        page.append_child(&container, &node)?;
    }

    debug!(count = config.star_count, "Star background populated");
    Ok(config.star_count)
}
