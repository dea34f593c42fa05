//! "Year in Pixels" image: export the year's worksheet as PDF, rasterize the
//! first page and crop away the white margin.

pub mod pdfium;
pub mod trim;

use std::sync::Arc;

use image::{Rgb, RgbImage};
use tracing::info;

use pixelbot_common::traits::api::{PageRasterizer, SpreadsheetApi};

use crate::Error;
use crate::sheets::WorksheetProvisioner;

pub use pdfium::PdfiumRasterizer;

pub const RENDER_DPI: u32 = 600;
pub const IMAGE_FILENAME: &str = "YearInPixels.png";
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

pub struct YearRenderer {
    sheets: Arc<dyn SpreadsheetApi>,
    provisioner: Arc<WorksheetProvisioner>,
    rasterizer: Arc<dyn PageRasterizer>,
    dpi: u32,
}

impl YearRenderer {
    pub fn new(
        sheets: Arc<dyn SpreadsheetApi>,
        provisioner: Arc<WorksheetProvisioner>,
        rasterizer: Arc<dyn PageRasterizer>,
    ) -> Self {
        Self {
            sheets,
            provisioner,
            rasterizer,
            dpi: RENDER_DPI,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// PNG bytes for `year`. A year without a worksheet is `NotFound`; this
    /// path never creates worksheets.
    pub async fn render_year(&self, year: i32) -> Result<Vec<u8>, Error> {
        let worksheet = self.provisioner.lookup(year).await?;
        let pdf = self.sheets.export_pdf(&worksheet).await?;
        let page = self.rasterizer.rasterize_first_page(pdf, self.dpi).await?;

        let png = tokio::task::spawn_blocking(move || {
            let image = RgbImage::from_raw(page.width, page.height, page.pixels).ok_or_else(|| {
                Error::Render(format!("rasterizer returned a short buffer for {}x{}", page.width, page.height))
            })?;
            let trimmed = trim::trim_uniform_border(image, BACKGROUND);
            trim::encode_png(&trimmed)
        })
        .await
        .map_err(|e| Error::Render(format!("image task failed: {e}")))??;

        info!("(Renderer) Rendered {year} ({} bytes)", png.len());
        Ok(png)
    }
}
