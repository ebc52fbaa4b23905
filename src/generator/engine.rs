//! Headless Chrome rendering engine.
//!
//! Writes the populated HTML to a temporary directory, loads it in a fresh
//! browser process, and exports a PDF and a JPEG screenshot. The browser is
//! torn down when the render finishes.

use std::fs;
use std::path::PathBuf;

use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use tempfile::tempdir;

use super::GeneratorError;

const PAGE_FILENAME: &str = "certificate.html";

// A4 in inches, landscape orientation is applied by the browser.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;
// 20 CSS pixels at 96 dpi.
const MARGIN_IN: f64 = 20.0 / 96.0;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub jpeg_quality: u32,
    pub chrome_path: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1200,
            viewport_height: 900,
            jpeg_quality: 90,
            chrome_path: None,
        }
    }
}

/// Output of one render.
#[derive(Debug)]
pub struct RenderedCertificate {
    pub pdf: Vec<u8>,
    pub jpg: Vec<u8>,
}

/// Stateless engine, one browser per call.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderEngine {
    options: RenderOptions,
}

impl ChromeRenderEngine {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render an HTML document to PDF and JPEG bytes. Blocks the calling thread.
    pub fn render(&self, html: &str) -> Result<RenderedCertificate, GeneratorError> {
        let temp_dir = tempdir().map_err(GeneratorError::WriteHtml)?;
        let page_path = temp_dir.path().join(PAGE_FILENAME);
        fs::write(&page_path, html).map_err(GeneratorError::WriteHtml)?;
        let url = format!("file://{}", page_path.display());

        let browser = self.launch()?;
        log::debug!("Browser launched, loading {}", url);

        let tab = browser
            .new_tab()
            .map_err(|e| GeneratorError::BrowserLaunch(anyhow::anyhow!("failed to open tab: {}", e)))?;

        tab.navigate_to(&url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| GeneratorError::Render(anyhow::anyhow!("navigation failed: {}", e)))?;

        let pdf = tab
            .print_to_pdf(Some(PrintToPdfOptions {
                landscape: Some(true),
                print_background: Some(true),
                paper_width: Some(A4_WIDTH_IN),
                paper_height: Some(A4_HEIGHT_IN),
                margin_top: Some(MARGIN_IN),
                margin_right: Some(MARGIN_IN),
                margin_bottom: Some(MARGIN_IN),
                margin_left: Some(MARGIN_IN),
                ..Default::default()
            }))
            .map_err(|e| GeneratorError::Render(anyhow::anyhow!("PDF export failed: {}", e)))?;
        log::debug!("PDF exported ({} bytes)", pdf.len());

        // Clip to the whole document so content below the fold is captured.
        let full_page = tab
            .find_element("html")
            .and_then(|element| element.get_box_model())
            .map(|model| model.margin_viewport())
            .map_err(|e| GeneratorError::Render(anyhow::anyhow!("failed to measure page: {}", e)))?;

        let jpg = tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Jpeg,
                Some(self.options.jpeg_quality),
                Some(full_page),
                true,
            )
            .map_err(|e| GeneratorError::Render(anyhow::anyhow!("screenshot failed: {}", e)))?;
        log::debug!("JPEG captured ({} bytes)", jpg.len());

        drop(tab);
        drop(browser);

        Ok(RenderedCertificate { pdf, jpg })
    }

    fn launch(&self) -> Result<Browser, GeneratorError> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((self.options.viewport_width, self.options.viewport_height)))
            .path(self.options.chrome_path.clone())
            .build()
            .map_err(|e| {
                GeneratorError::BrowserLaunch(anyhow::anyhow!("invalid launch options: {}", e))
            })?;

        Browser::new(launch_options).map_err(|e| GeneratorError::BrowserLaunch(anyhow::anyhow!("{}", e)))
    }
}
