use crate::config::LabelConfig;
use crate::font::{
    FontDescriptor, FontFamilyCatalog, FontMatcher, FontResolver, StaticFontBackend,
};
use crate::spans::serialize;
use crate::text::{DeterministicTextMeasurer, TextExtent, TextMeasurer};
use crate::Result;
use labelmark_core::{StyledText, parse_styled};
use std::sync::Arc;

#[derive(Clone)]
enum CatalogHandle {
    Global(&'static FontFamilyCatalog),
    Owned(Arc<FontFamilyCatalog>),
}

impl CatalogHandle {
    fn get(&self) -> &FontFamilyCatalog {
        match self {
            Self::Global(catalog) => catalog,
            Self::Owned(catalog) => catalog,
        }
    }
}

/// Markup to `<tspan>` conversion plus font resolution and extent queries.
#[derive(Clone)]
pub struct LabelEngine {
    config: LabelConfig,
    text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
    font_matcher: Arc<dyn FontMatcher + Send + Sync>,
    catalog: CatalogHandle,
}

impl Default for LabelEngine {
    fn default() -> Self {
        Self::new(LabelConfig::default())
    }
}

impl LabelEngine {
    /// Deterministic measurement, an empty catalog and generic-keyword font matching.
    pub fn new(config: LabelConfig) -> Self {
        Self {
            config,
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
            font_matcher: Arc::new(StaticFontBackend::default()),
            catalog: CatalogHandle::Owned(Arc::new(FontFamilyCatalog::default())),
        }
    }

    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.text_measurer = measurer;
        self
    }

    pub fn with_font_matcher(mut self, matcher: Arc<dyn FontMatcher + Send + Sync>) -> Self {
        self.font_matcher = matcher;
        self
    }

    pub fn with_catalog(mut self, catalog: FontFamilyCatalog) -> Self {
        self.catalog = CatalogHandle::Owned(Arc::new(catalog));
        self
    }

    /// Uses the process-wide catalog (see [`crate::font::init_global_catalog`]).
    pub fn with_global_catalog(mut self, catalog: &'static FontFamilyCatalog) -> Self {
        self.catalog = CatalogHandle::Global(catalog);
        self
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn catalog(&self) -> &FontFamilyCatalog {
        self.catalog.get()
    }

    pub fn styled(&self, markup: &str) -> Result<StyledText> {
        Ok(parse_styled(markup)?)
    }

    pub fn markup_to_spans(&self, markup: &str) -> Result<String> {
        let styled = self.styled(markup)?;
        Ok(serialize(
            &styled.text,
            &styled.runs,
            &self.config.span_options(),
        ))
    }

    /// Falls back to the configured family list and size when not given.
    pub fn font_descriptor(
        &self,
        families: Option<&str>,
        size_px: Option<f64>,
    ) -> Result<FontDescriptor> {
        let families = families.unwrap_or(&self.config.font_family);
        let size_px = size_px.unwrap_or(self.config.font_size_px);
        let resolver = FontResolver::new(self.catalog.get(), self.font_matcher.as_ref());
        Ok(resolver.resolve(families, size_px)?)
    }

    pub fn measure_text(
        &self,
        text: &str,
        families: Option<&str>,
        size_px: Option<f64>,
    ) -> Result<TextExtent> {
        let font = self.font_descriptor(families, size_px)?;
        Ok(self.text_measurer.measure(&font, text)?)
    }

    /// Extent of the formatted markup: each run is measured at its scaled size, widths add
    /// up along a line and the tallest piece sets the line height.
    pub fn measure_markup(
        &self,
        markup: &str,
        families: Option<&str>,
        size_px: Option<f64>,
    ) -> Result<TextExtent> {
        let styled = self.styled(markup)?;
        let base = self.font_descriptor(families, size_px)?;
        let Some(slices) = scaled_slices(&styled) else {
            tracing::debug!("run offsets do not split the text cleanly; measuring unformatted");
            return Ok(self.text_measurer.measure(&base, &styled.text)?);
        };

        let mut lines: Vec<LineExtent> = Vec::new();
        let mut line = LineExtent::default();
        for (slice, scale) in slices {
            let font = if scale == 1.0 {
                base.clone()
            } else {
                FontDescriptor::new(base.family(), base.size_px() * scale)
            };
            for (i, piece) in slice.split('\n').enumerate() {
                if i > 0 {
                    lines.push(std::mem::take(&mut line));
                }
                if piece.is_empty() {
                    if line.measured {
                        continue;
                    }
                    let extent = self.text_measurer.measure(&font, piece)?;
                    line.height = line.height.max(extent.height);
                    continue;
                }
                let extent = self.text_measurer.measure(&font, piece)?;
                line.width += extent.width;
                line.height = if line.measured {
                    line.height.max(extent.height)
                } else {
                    extent.height
                };
                line.measured = true;
            }
        }
        lines.push(line);

        Ok(TextExtent {
            width: lines.iter().map(|l| l.width).fold(0.0, f64::max),
            height: lines.iter().map(|l| l.height).sum(),
            line_count: lines.len(),
        })
    }
}

#[derive(Debug, Default)]
struct LineExtent {
    width: f64,
    height: f64,
    measured: bool,
}

/// Text slices with the font scale active over each; `None` if a run offset is out of order
/// or not on a char boundary.
fn scaled_slices(styled: &StyledText) -> Option<Vec<(&str, f64)>> {
    let text = styled.text.as_str();
    if text.is_empty() {
        return Some(vec![("", 1.0)]);
    }
    let mut out = Vec::with_capacity(styled.runs.len() + 1);
    let first = styled.runs.first().map_or(text.len(), |run| run.start.min(text.len()));
    if first > 0 {
        out.push((text.get(..first)?, 1.0));
    }
    for (i, run) in styled.runs.iter().enumerate() {
        let start = run.start.min(text.len());
        let end = styled
            .runs
            .get(i + 1)
            .map_or(text.len(), |next| next.start.min(text.len()));
        if end < start {
            return None;
        }
        if start == end {
            continue;
        }
        out.push((text.get(start..end)?, run.state.scale.unwrap_or(1.0)));
    }
    Some(out)
}
