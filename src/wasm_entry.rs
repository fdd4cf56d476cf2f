// WASM専用のエントリーポイント

use crate::api::{HttpLikesApi, LikeError};
use crate::dom_renderer::dom::{document, page_origin, DomAffordance};
use crate::engine::controller::LikeToggleController;
use crate::engine::state::CafeId;
use crate::ui::affordance::ButtonPair;
use crate::ui::mount::MountRegistry;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use wasm_bindgen::prelude::*;

type DomController = LikeToggleController<HttpLikesApi, DomAffordance>;

pub const LIKE_BUTTON_ID: &str = "like";
pub const UNLIKE_BUTTON_ID: &str = "unlike";

// ボタンのハンドラは弱参照なので、ページが生きている間ここで保持する
thread_local! {
    static MOUNTED: RefCell<MountRegistry<DomController>> = RefCell::new(MountRegistry::new());
}

fn init_browser_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // パニック時のエラーメッセージをブラウザコンソールに表示
        console_error_panic_hook::set_once();

        // WebAssembly用のロガーを初期化（二重初期化は無視）
        console_log::init_with_level(log::Level::Debug).ok();
    });
}

/// `#like` / `#unlike` ボタンにいいね機能を接続する
///
/// ページ側から `start_liking(cafeId)` として呼び出す。
#[wasm_bindgen]
pub fn start_liking(cafe_id: u32) -> Result<(), JsValue> {
    start_liking_with(cafe_id, LIKE_BUTTON_ID, UNLIKE_BUTTON_ID)
}

/// ボタンIDを指定していいね機能を接続する
///
/// 同じボタンに対する2回目以降の呼び出しは警告を出して何もしない。
#[wasm_bindgen]
pub fn start_liking_with(cafe_id: u32, like_id: &str, unlike_id: &str) -> Result<(), JsValue> {
    init_browser_logging();

    if MOUNTED.with(|mounted| mounted.borrow().is_mounted(like_id, unlike_id)) {
        log::warn!(
            "#{} / #{} already wired up; ignoring start_liking for cafe {}",
            like_id,
            unlike_id,
            cafe_id
        );
        return Ok(());
    }

    let controller = mount(CafeId::from(cafe_id), like_id, unlike_id)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    MOUNTED.with(|mounted| {
        mounted
            .borrow_mut()
            .insert(like_id, unlike_id, Rc::clone(&controller))
    });

    wasm_bindgen_futures::spawn_local(async move {
        // エラーはコントローラ内でログ済み。ボタンは非表示のまま
        let _ = controller.initialize().await;
    });

    Ok(())
}

fn mount(
    cafe_id: CafeId,
    like_id: &str,
    unlike_id: &str,
) -> Result<Rc<DomController>, LikeError> {
    let document = document()?;
    let buttons = ButtonPair::new(
        DomAffordance::find(&document, like_id)?,
        DomAffordance::find(&document, unlike_id)?,
    );
    let api = HttpLikesApi::new(&page_origin()?);

    log::info!("Liking widget starting for cafe {} (api: {})", cafe_id, api.base_url());

    let controller = Rc::new(LikeToggleController::new(cafe_id, api, buttons));
    controller.attach();
    Ok(controller)
}
