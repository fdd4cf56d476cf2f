use crate::engine::state::LikeState;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// クリックイベント（DOMの `Event` に相当）
pub trait ClickEvent {
    /// ブラウザ既定の動作を抑制する
    fn prevent_default(&self);
}

pub type ClickHandler = Box<dyn Fn(&dyn ClickEvent)>;

/// ユーザー操作を1つ公開するUI要素
pub trait Affordance {
    fn set_visible(&self, visible: bool);
    fn is_visible(&self) -> bool;
    /// クリック時に呼ばれるハンドラを登録する
    fn on_click(&self, handler: ClickHandler);

    fn show(&self) {
        self.set_visible(true);
    }

    fn hide(&self) {
        self.set_visible(false);
    }
}

/// 「いいね」と「いいね解除」のボタン対
pub struct ButtonPair<B> {
    pub like: B,
    pub unlike: B,
}

impl<B: Affordance> ButtonPair<B> {
    pub fn new(like: B, unlike: B) -> Self {
        Self { like, unlike }
    }

    /// 状態に応じて表示を切り替える（`Unknown` は両方非表示）
    pub fn reveal(&self, state: LikeState) {
        let (like, unlike) = state.visibility();
        // 一時的にも両方表示にならないよう、先に隠す
        if !like {
            self.like.set_visible(false);
        }
        if !unlike {
            self.unlike.set_visible(false);
        }
        if like {
            self.like.set_visible(true);
        }
        if unlike {
            self.unlike.set_visible(true);
        }
    }

    /// (likeボタン表示, unlikeボタン表示)
    pub fn visibility(&self) -> (bool, bool) {
        (self.like.is_visible(), self.unlike.is_visible())
    }
}

/// メモリ上のボタン（ネイティブ実行とテスト用）
#[derive(Clone, Default)]
pub struct MemoryButton {
    inner: Rc<MemoryButtonInner>,
}

#[derive(Default)]
struct MemoryButtonInner {
    label: String,
    visible: Cell<bool>,
    handlers: RefCell<Vec<ClickHandler>>,
}

impl MemoryButton {
    pub fn new(label: &str) -> Self {
        Self {
            inner: Rc::new(MemoryButtonInner {
                label: label.to_string(),
                ..Default::default()
            }),
        }
    }

    /// 表示状態を指定して作成
    pub fn with_visible(label: &str, visible: bool) -> Self {
        let button = Self::new(label);
        button.inner.visible.set(visible);
        button
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// 登録済みハンドラを順に呼び出し、発行したイベントを返す
    pub fn click(&self) -> MemoryClick {
        let event = MemoryClick::default();
        for handler in self.inner.handlers.borrow().iter() {
            handler(&event);
        }
        event
    }

    pub fn handler_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }
}

impl Affordance for MemoryButton {
    fn set_visible(&self, visible: bool) {
        self.inner.visible.set(visible);
    }

    fn is_visible(&self) -> bool {
        self.inner.visible.get()
    }

    fn on_click(&self, handler: ClickHandler) {
        self.inner.handlers.borrow_mut().push(handler);
    }
}

impl std::fmt::Debug for MemoryButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryButton")
            .field("label", &self.inner.label)
            .field("visible", &self.inner.visible.get())
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// メモリ上のクリックイベント
#[derive(Debug, Default)]
pub struct MemoryClick {
    default_prevented: Cell<bool>,
}

impl MemoryClick {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl ClickEvent for MemoryClick {
    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }
}
