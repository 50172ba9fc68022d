//! Скачивание CSV в браузере через Blob и временный object URL

use contracts::shared::export::{csv_filename, ExportError};
use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, HtmlElement, Url};

/// Задержка перед освобождением URL: браузер должен успеть начать загрузку
const REVOKE_DELAY_MS: u32 = 1_000;

fn js_err(context: &str, e: JsValue) -> ExportError {
    ExportError::ExportFailed(format!("{}: {:?}", context, e))
}

/// Object URL, который освобождается при drop
struct BlobUrl {
    url: String,
}

impl BlobUrl {
    fn create(blob: &Blob) -> Result<Self, ExportError> {
        let url = Url::create_object_url_with_blob(blob)
            .map_err(|e| js_err("Failed to create object URL", e))?;
        Ok(Self { url })
    }

    fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for BlobUrl {
    fn drop(&mut self) {
        if let Err(e) = Url::revoke_object_url(&self.url) {
            log::warn!("Failed to revoke object URL {}: {:?}", self.url, e);
        }
    }
}

/// Скрытая ссылка в DOM, удаляется при drop
struct TempAnchor {
    body: HtmlElement,
    anchor: HtmlAnchorElement,
}

impl TempAnchor {
    fn attach(document: &Document, href: &str, filename: &str) -> Result<Self, ExportError> {
        let anchor = document
            .create_element("a")
            .map_err(|e| js_err("Failed to create anchor", e))?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|e| js_err("Failed to cast to anchor", e.into()))?;

        anchor.set_href(href);
        anchor.set_download(filename);
        anchor
            .style()
            .set_property("display", "none")
            .map_err(|e| js_err("Failed to set style", e))?;

        let body = document
            .body()
            .ok_or_else(|| ExportError::export_failed("No body element"))?;
        body.append_child(&anchor)
            .map_err(|e| js_err("Failed to append anchor", e))?;

        Ok(Self { body, anchor })
    }

    fn click(&self) {
        self.anchor.click();
    }
}

impl Drop for TempAnchor {
    fn drop(&mut self) {
        let _ = self.body.remove_child(&self.anchor);
    }
}

/// Создаёт Blob с CSV данными
fn create_csv_blob(content: &str) -> Result<Blob, ExportError> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("text/csv;charset=utf-8;");

    Blob::new_with_str_sequence_and_options(&parts, &properties)
        .map_err(|e| js_err("Failed to create blob", e))
}

/// Инициирует скачивание CSV текста как файла `<filename>.csv`.
///
/// URL освобождается в любом случае: при ошибке сразу, при успехе
/// по таймеру, после того как браузер подхватил загрузку.
pub fn trigger_download(csv_text: &str, filename: &str) -> Result<(), ExportError> {
    let window = web_sys::window().ok_or_else(|| ExportError::export_failed("No window object"))?;
    let document = window
        .document()
        .ok_or_else(|| ExportError::export_failed("No document object"))?;

    let filename = csv_filename(filename);
    let blob = create_csv_blob(csv_text)?;
    let url = BlobUrl::create(&blob)?;

    {
        let anchor = TempAnchor::attach(&document, url.as_str(), &filename)?;
        anchor.click();
    }

    log::info!("CSV download started: {} ({} bytes)", filename, csv_text.len());

    Timeout::new(REVOKE_DELAY_MS, move || drop(url)).forget();
    Ok(())
}
