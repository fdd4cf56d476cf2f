use crate::api::LikeError;
use crate::dom_renderer::display::{display_to_show, is_shown};
use crate::ui::affordance::{Affordance, ClickEvent, ClickHandler};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{window, Document, HtmlElement};

/// ページ上のボタン要素
///
/// 表示切り替えは `style.display` で行う（jQueryの show/hide と同じ）。
/// 表示状態の判定は計算済みスタイルを見るので、スタイルシートで隠されていても正しく判定できる。
#[derive(Debug, Clone)]
pub struct DomAffordance {
    id: String,
    element: HtmlElement,
}

impl DomAffordance {
    /// IDで要素を検索する
    pub fn find(document: &Document, id: &str) -> Result<Self, LikeError> {
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| LikeError::Dom(format!("element #{} not found", id)))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| LikeError::Dom(format!("element #{} is not an HTML element", id)))?;

        Ok(Self { id: id.to_string(), element })
    }

    /// スタイルシートを含めた計算済みの display 値
    fn computed_display(&self) -> Result<String, LikeError> {
        window()
            .ok_or_else(|| LikeError::Dom("no window available".to_string()))?
            .get_computed_style(&self.element)
            .map_err(|e| LikeError::Dom(format!("getComputedStyle failed: {:?}", e)))?
            .ok_or_else(|| LikeError::Dom(format!("no computed style for #{}", self.id)))?
            .get_property_value("display")
            .map_err(|e| LikeError::Dom(format!("failed to read display: {:?}", e)))
    }

    fn show_element(&self) -> Result<(), LikeError> {
        let style = self.element.style();
        style
            .remove_property("display")
            .map_err(|e| LikeError::Dom(format!("{:?}", e)))?;

        // インライン指定を外してもスタイルシートで隠れている
        if let Some(display) = display_to_show(&self.computed_display()?) {
            style
                .set_property("display", display)
                .map_err(|e| LikeError::Dom(format!("{:?}", e)))?;
        }
        Ok(())
    }

    fn hide_element(&self) -> Result<(), LikeError> {
        self.element
            .style()
            .set_property("display", "none")
            .map_err(|e| LikeError::Dom(format!("{:?}", e)))
    }
}

impl Affordance for DomAffordance {
    fn set_visible(&self, visible: bool) {
        let result = if visible { self.show_element() } else { self.hide_element() };
        if let Err(e) = result {
            log::error!("Failed to update #{} visibility: {}", self.id, e);
        }
    }

    fn is_visible(&self) -> bool {
        match self.computed_display() {
            Ok(display) => is_shown(&display),
            Err(e) => {
                log::warn!("Failed to read #{} visibility: {}", self.id, e);
                false
            }
        }
    }

    fn on_click(&self, handler: ClickHandler) {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            handler(&DomClick(event));
        }) as Box<dyn FnMut(_)>);

        if let Err(e) = self
            .element
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        {
            log::error!("Failed to register click listener on #{}: {:?}", self.id, e);
        }
        // ページが生きている間は保持する
        closure.forget();
    }
}

/// DOMのクリックイベント
pub struct DomClick(pub web_sys::Event);

impl ClickEvent for DomClick {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

/// 現在のドキュメントを取得
pub fn document() -> Result<Document, LikeError> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| LikeError::Dom("no document available".to_string()))
}

/// APIのベースURL（現在のページのオリジン）
pub fn page_origin() -> Result<String, LikeError> {
    window()
        .ok_or_else(|| LikeError::Dom("no window available".to_string()))?
        .location()
        .origin()
        .map_err(|e| LikeError::Dom(format!("failed to read location.origin: {:?}", e)))
}
