//! Browser integrations: DOM score board, fetched models, tuning script tag

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Response};

use crate::assets::{AssetError, AssetLoader, AssetTicket, Model, ModelAsset, asset_channel};
use crate::sim::ScoreSink;
use crate::tuning::Tuning;

/// Writes the score into a DOM element's text
pub struct DomScoreSink {
    element: Option<Element>,
}

impl DomScoreSink {
    pub fn new(element_id: &str) -> Self {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(element_id));
        if element.is_none() {
            log::warn!("No #{} element; score will not be shown", element_id);
        }
        Self { element }
    }
}

impl ScoreSink for DomScoreSink {
    fn show_score(&mut self, text: &str) {
        if let Some(el) = &self.element {
            el.set_text_content(Some(text));
        }
    }
}

/// Fetches model files over HTTP relative to the page
#[derive(Debug, Default)]
pub struct FetchLoader;

impl FetchLoader {
    pub fn new() -> Self {
        Self
    }
}

fn js_reason(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

async fn fetch_text(url: &'static str) -> Result<String, AssetError> {
    let fetch_error = |reason: String| AssetError::Fetch {
        url: url.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| fetch_error("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_error(js_reason(e)))?
        .dyn_into()
        .map_err(|e| fetch_error(js_reason(e)))?;

    if !response.ok() {
        return Err(fetch_error(format!("HTTP {}", response.status())));
    }

    let text = JsFuture::from(response.text().map_err(|e| fetch_error(js_reason(e)))?)
        .await
        .map_err(|e| fetch_error(js_reason(e)))?;
    text.as_string()
        .ok_or_else(|| fetch_error("response body is not text".into()))
}

async fn fetch_model(asset: ModelAsset) -> Result<Model, AssetError> {
    let obj_src = fetch_text(asset.obj).await?;
    let mtl_src = fetch_text(asset.mtl).await?;
    Model::from_sources(asset, &obj_src, &mtl_src)
}

impl AssetLoader for FetchLoader {
    fn load(&mut self, asset: ModelAsset) -> AssetTicket {
        let (promise, ticket) = asset_channel();
        wasm_bindgen_futures::spawn_local(async move {
            match fetch_model(asset).await {
                Ok(model) => {
                    log::debug!("Loaded model '{}'", asset.name);
                    promise.resolve(model);
                }
                Err(e) => log::warn!("Model '{}' unavailable: {}", asset.name, e),
            }
        });
        ticket
    }
}

/// Tuning overrides from `<script id="tuning" type="application/json">`
pub fn read_tuning() -> Tuning {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("tuning"))
        .and_then(|el| el.text_content());
    match text {
        Some(json) if !json.trim().is_empty() => Tuning::from_json_or_default(&json),
        _ => Tuning::default(),
    }
}
