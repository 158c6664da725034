//! Request and response models for the conversion API.
//!
//! Export parameter defaults mirror the upstream converter's own, so a
//! request body only needs the knobs it wants to change.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::ApiError;

/// Vision model used for picture description enrichment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisionModel {
    #[default]
    Granite,
    Smolvlm,
}

/// How an exported document refers to its images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRefMode {
    #[default]
    Placeholder,
    Embedded,
    Referenced,
}

/// Content layers of a structured document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentLayer {
    Body,
    Furniture,
    Background,
}

/// Labels a structured document assigns to its items.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DocItemLabel {
    Caption,
    CheckboxSelected,
    CheckboxUnselected,
    Code,
    DocumentIndex,
    Footnote,
    Form,
    Formula,
    KeyValueRegion,
    ListItem,
    PageFooter,
    PageHeader,
    Paragraph,
    Picture,
    Reference,
    SectionHeader,
    Table,
    Text,
    Title,
}

fn default_true() -> bool {
    true
}

fn default_to_element() -> usize {
    1_000_000
}

fn default_image_placeholder() -> String {
    "<!-- image -->".to_string()
}

fn default_indent() -> usize {
    4
}

fn default_text_width() -> i64 {
    -1
}

fn default_html_lang() -> String {
    "en".to_string()
}

fn default_html_head() -> String {
    "null".to_string()
}

fn default_picture_scale() -> u32 {
    2
}

/// Element selection shared by every export format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseExportParams {
    #[serde(default)]
    pub from_element: usize,
    #[serde(default = "default_to_element")]
    pub to_element: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeSet<DocItemLabel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_content_layers: Option<BTreeSet<ContentLayer>>,
}

impl Default for BaseExportParams {
    fn default() -> Self {
        Self {
            from_element: 0,
            to_element: default_to_element(),
            labels: None,
            included_content_layers: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownExportParams {
    #[serde(flatten)]
    pub base: BaseExportParams,
    #[serde(default = "default_true")]
    pub escape_underscores: bool,
    #[serde(default = "default_image_placeholder")]
    pub image_placeholder: String,
    #[serde(default = "default_true")]
    pub enable_chart_tables: bool,
    #[serde(default)]
    pub image_mode: ImageRefMode,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default = "default_text_width")]
    pub text_width: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_break_placeholder: Option<String>,
}

impl Default for MarkdownExportParams {
    fn default() -> Self {
        Self {
            base: BaseExportParams::default(),
            escape_underscores: true,
            image_placeholder: default_image_placeholder(),
            enable_chart_tables: true,
            image_mode: ImageRefMode::default(),
            indent: default_indent(),
            text_width: default_text_width(),
            page_break_placeholder: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlExportParams {
    #[serde(flatten)]
    pub base: BaseExportParams,
    #[serde(default = "default_true")]
    pub enable_chart_tables: bool,
    #[serde(default = "default_true")]
    pub formula_to_mathml: bool,
    #[serde(default = "default_html_lang")]
    pub html_lang: String,
    #[serde(default = "default_html_head")]
    pub html_head: String,
    #[serde(default)]
    pub split_page_view: bool,
}

impl Default for HtmlExportParams {
    fn default() -> Self {
        Self {
            base: BaseExportParams::default(),
            enable_chart_tables: true,
            formula_to_mathml: true,
            html_lang: default_html_lang(),
            html_head: default_html_head(),
            split_page_view: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextExportParams {
    #[serde(flatten)]
    pub base: BaseExportParams,
}

/// Enrichment passes run by the conversion backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentOptions {
    #[serde(default)]
    pub enrich_code: bool,
    #[serde(default)]
    pub enrich_formula: bool,
    #[serde(default)]
    pub enrich_pictures: bool,
    #[serde(default = "default_picture_scale")]
    pub picture_scale: u32,
    #[serde(default)]
    pub enrich_picture_description: bool,
    #[serde(default)]
    pub vision_model: VisionModel,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            enrich_code: false,
            enrich_formula: false,
            enrich_pictures: false,
            picture_scale: default_picture_scale(),
            enrich_picture_description: false,
            vision_model: VisionModel::default(),
        }
    }
}

impl EnrichmentOptions {
    /// Bounds check for the one field serde cannot range-validate.
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(1..=10).contains(&self.picture_scale) {
            return Err(ApiError::InvalidRequest(format!(
                "picture_scale must be between 1 and 10, got {}",
                self.picture_scale
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertToMarkdownRequest {
    pub source: String,
    #[serde(flatten)]
    pub enrichment: EnrichmentOptions,
    pub markdown_params: MarkdownExportParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertToHtmlRequest {
    pub source: String,
    #[serde(flatten)]
    pub enrichment: EnrichmentOptions,
    pub html_params: HtmlExportParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertToTextRequest {
    pub source: String,
    #[serde(flatten)]
    pub enrichment: EnrichmentOptions,
    pub text_params: TextExportParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Html,
    Text,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExportParams {
    Markdown(MarkdownExportParams),
    Html(HtmlExportParams),
    Text(TextExportParams),
}

/// A conversion ready for dispatch. Also the exact JSON payload POSTed to a
/// conversion backend.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionJob {
    pub source: String,
    #[serde(flatten)]
    pub enrichment: EnrichmentOptions,
    pub format: ExportFormat,
    pub params: ExportParams,
}

impl ConvertToMarkdownRequest {
    pub fn into_job(self) -> ConversionJob {
        ConversionJob {
            source: self.source,
            enrichment: self.enrichment,
            format: ExportFormat::Markdown,
            params: ExportParams::Markdown(self.markdown_params),
        }
    }
}

impl ConvertToHtmlRequest {
    pub fn into_job(self) -> ConversionJob {
        ConversionJob {
            source: self.source,
            enrichment: self.enrichment,
            format: ExportFormat::Html,
            params: ExportParams::Html(self.html_params),
        }
    }
}

impl ConvertToTextRequest {
    pub fn into_job(self) -> ConversionJob {
        ConversionJob {
            source: self.source,
            enrichment: self.enrichment,
            format: ExportFormat::Text,
            params: ExportParams::Text(self.text_params),
        }
    }
}

/// Backend reply, passed through verbatim as the API response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub content: String,
}

/// Queued conversion with its one-time reply channel.
pub struct QueuedJob {
    pub job: ConversionJob,
    pub response_tx: oneshot::Sender<Result<ConvertResponse, ApiError>>,
}
