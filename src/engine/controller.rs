use crate::api::{LikeError, LikesApi};
use crate::engine::async_call::LocalFuture;
use crate::engine::state::{Action, ActionOutcome, CafeId, LikeState};
use crate::ui::affordance::{Affordance, ButtonPair, ClickEvent};
use crate::ui::event::UIEvent;
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

/// 書き込みリクエスト処理中フラグ（Dropで解放される）
struct InFlight {
    flag: Rc<Cell<bool>>,
}

impl InFlight {
    fn acquire(flag: &Rc<Cell<bool>>) -> Option<Self> {
        if flag.get() {
            return None;
        }
        flag.set(true);
        Some(Self { flag: Rc::clone(flag) })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// いいね/いいね解除ボタンの表示をリモートの状態と同期させるコントローラ
///
/// シングルスレッドのイベントループ上で動作する前提で、内部状態は `Cell` で持つ。
/// 書き込みリクエストは同時に1つだけ受け付け、処理中に来た操作は破棄する。
pub struct LikeToggleController<A, B> {
    cafe_id: CafeId,
    api: A,
    buttons: ButtonPair<B>,
    state: Cell<LikeState>,
    in_flight: Rc<Cell<bool>>,
}

impl<A, B> LikeToggleController<A, B>
where
    A: LikesApi,
    B: Affordance,
{
    /// コントローラを作成する。状態が `Unknown` なので両方のボタンを隠す。
    pub fn new(cafe_id: CafeId, api: A, buttons: ButtonPair<B>) -> Self {
        buttons.reveal(LikeState::Unknown);
        Self {
            cafe_id,
            api,
            buttons,
            state: Cell::new(LikeState::Unknown),
            in_flight: Rc::new(Cell::new(false)),
        }
    }

    pub fn cafe_id(&self) -> CafeId {
        self.cafe_id
    }

    pub fn state(&self) -> LikeState {
        self.state.get()
    }

    pub fn buttons(&self) -> &ButtonPair<B> {
        &self.buttons
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 書き込みリクエストが処理中かどうか
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// リモートから現在の状態を取得し、対応するボタンを表示する
    ///
    /// エラー時はログを出してボタンを表示しないままにする。
    pub async fn initialize(&self) -> Result<LikeState, LikeError> {
        log::debug!("Fetching like status for cafe {}", self.cafe_id);
        match self.api.fetch_likes(self.cafe_id).await {
            Ok(likes) => {
                let state = LikeState::from_likes(likes);
                self.apply(state);
                Ok(state)
            }
            Err(e) => {
                self.report("initialize", &e);
                Err(e)
            }
        }
    }

    /// 「いいね」ボタンのハンドラ
    ///
    /// 既定の動作の抑制はFutureを返す前に同期的に行う。
    pub fn on_like_requested<'a>(
        &'a self,
        event: &dyn ClickEvent,
    ) -> impl Future<Output = Result<ActionOutcome, LikeError>> + use<'a, A, B> {
        self.request(Action::Like, event)
    }

    /// 「いいね解除」ボタンのハンドラ
    pub fn on_unlike_requested<'a>(
        &'a self,
        event: &dyn ClickEvent,
    ) -> impl Future<Output = Result<ActionOutcome, LikeError>> + use<'a, A, B> {
        self.request(Action::Unlike, event)
    }

    /// キューから取り出したUIイベントを処理する
    pub async fn dispatch(
        &self,
        event: &UIEvent,
        click: &dyn ClickEvent,
    ) -> Result<ActionOutcome, LikeError> {
        match event {
            UIEvent::LikePressed => self.on_like_requested(click).await,
            UIEvent::UnlikePressed => self.on_unlike_requested(click).await,
            UIEvent::TogglePressed => match self.state().toggle_action() {
                Some(action) => self.request(action, click).await,
                None => {
                    log::warn!("Nothing to toggle for cafe {}: status unknown", self.cafe_id);
                    Ok(ActionOutcome::Skipped)
                }
            },
            UIEvent::Refresh => self.initialize().await.map(ActionOutcome::Applied),
        }
    }

    fn request<'a>(
        &'a self,
        action: Action,
        event: &dyn ClickEvent,
    ) -> impl Future<Output = Result<ActionOutcome, LikeError>> + use<'a, A, B> {
        let token = self.begin(action, event);
        self.complete(action, token)
    }

    /// 同期部分: 既定動作を抑制し、処理中フラグを取る
    fn begin(&self, action: Action, event: &dyn ClickEvent) -> Option<InFlight> {
        event.prevent_default();
        let token = InFlight::acquire(&self.in_flight);
        if token.is_none() {
            log::debug!(
                "Ignoring {} for cafe {}: another request is in flight",
                action.name(),
                self.cafe_id
            );
        }
        token
    }

    /// 非同期部分: リモートへ書き込み、成功時のみUIを更新する
    async fn complete(
        &self,
        action: Action,
        token: Option<InFlight>,
    ) -> Result<ActionOutcome, LikeError> {
        let Some(_token) = token else {
            return Ok(ActionOutcome::Skipped);
        };

        log::info!("Sending {} for cafe {}", action.name(), self.cafe_id);
        let result = match action {
            Action::Like => self.api.like(self.cafe_id).await,
            Action::Unlike => self.api.unlike(self.cafe_id).await,
        };

        if let Err(e) = result {
            self.report(action.name(), &e);
            return Err(e);
        }

        let state = action.target_state();
        self.apply(state);
        Ok(ActionOutcome::Applied(state))
    }

    fn apply(&self, state: LikeState) {
        log::debug!("cafe {}: {} -> {}", self.cafe_id, self.state.get(), state);
        self.state.set(state);
        self.buttons.reveal(state);
    }

    fn report(&self, operation: &str, error: &LikeError) {
        if error.is_remote() {
            log::error!("{} for cafe {} rejected: {}", operation, self.cafe_id, error);
        } else {
            log::error!("{} for cafe {} failed: {}", operation, self.cafe_id, error);
        }
    }
}

impl<A, B> LikeToggleController<A, B>
where
    A: LikesApi + 'static,
    B: Affordance + 'static,
{
    /// 両方のボタンのクリックにハンドラを登録する
    ///
    /// クリック時は既定動作をその場で抑制し、リモート呼び出しは `spawn` に渡す。
    pub fn attach_with<S>(self: &Rc<Self>, spawn: S)
    where
        S: Fn(LocalFuture) + Clone + 'static,
    {
        self.bind(Action::Like, spawn.clone());
        self.bind(Action::Unlike, spawn);
        log::debug!("Click handlers attached for cafe {}", self.cafe_id);
    }

    /// 現在のイベントループで実行するハンドラを登録する
    #[cfg(any(
        all(target_arch = "wasm32", feature = "wasm"),
        all(not(target_arch = "wasm32"), feature = "native")
    ))]
    pub fn attach(self: &Rc<Self>) {
        self.attach_with(crate::engine::async_call::spawn_local);
    }

    fn bind<S>(self: &Rc<Self>, action: Action, spawn: S)
    where
        S: Fn(LocalFuture) + 'static,
    {
        // ボタン -> ハンドラ -> コントローラの循環参照を避ける
        let weak = Rc::downgrade(self);
        let handler = move |event: &dyn ClickEvent| {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            let token = controller.begin(action, event);
            spawn(Box::pin(async move {
                let _ = controller.complete(action, token).await;
            }));
        };

        let button = match action {
            Action::Like => &self.buttons.like,
            Action::Unlike => &self.buttons.unlike,
        };
        button.on_click(Box::new(handler));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::affordance::{MemoryButton, MemoryClick};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    const CAFE: CafeId = CafeId(42);

    /// スポーンされたタスクを溜めておき、応答の到着順をテスト側で制御する
    #[derive(Default)]
    struct TaskQueue {
        tasks: RefCell<Vec<LocalFuture>>,
    }

    impl TaskQueue {
        fn push(&self, future: LocalFuture) {
            self.tasks.borrow_mut().push(future);
        }

        fn len(&self) -> usize {
            self.tasks.borrow().len()
        }

        fn is_empty(&self) -> bool {
            self.tasks.borrow().is_empty()
        }

        async fn run_all(&self) {
            loop {
                let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
                if tasks.is_empty() {
                    break;
                }
                for task in tasks {
                    task.await;
                }
            }
        }
    }

    /// 応答を事前に積んでおくテスト用API
    #[derive(Default)]
    struct ScriptedApi {
        likes: RefCell<VecDeque<Result<bool, LikeError>>>,
        writes: RefCell<VecDeque<Result<(), LikeError>>>,
        calls: RefCell<Vec<(&'static str, CafeId)>>,
        // 書き込みを外から解放するまで止める
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl ScriptedApi {
        fn with_likes(reply: Result<bool, LikeError>) -> Self {
            let api = Self::default();
            api.likes.borrow_mut().push_back(reply);
            api
        }

        fn then_write(self, reply: Result<(), LikeError>) -> Self {
            self.writes.borrow_mut().push_back(reply);
            self
        }

        fn calls(&self) -> Vec<(&'static str, CafeId)> {
            self.calls.borrow().clone()
        }

        async fn write(&self, name: &'static str, cafe_id: CafeId) -> Result<(), LikeError> {
            self.calls.borrow_mut().push((name, cafe_id));
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.writes.borrow_mut().pop_front().unwrap_or(Ok(()))
        }
    }

    #[async_trait(?Send)]
    impl LikesApi for ScriptedApi {
        async fn fetch_likes(&self, cafe_id: CafeId) -> Result<bool, LikeError> {
            self.calls.borrow_mut().push(("likes", cafe_id));
            self.likes
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(LikeError::Status(500)))
        }

        async fn like(&self, cafe_id: CafeId) -> Result<(), LikeError> {
            self.write("like", cafe_id).await
        }

        async fn unlike(&self, cafe_id: CafeId) -> Result<(), LikeError> {
            self.write("unlike", cafe_id).await
        }
    }

    fn controller(api: ScriptedApi) -> LikeToggleController<ScriptedApi, MemoryButton> {
        let buttons = ButtonPair::new(MemoryButton::new("like"), MemoryButton::new("unlike"));
        LikeToggleController::new(CAFE, api, buttons)
    }

    #[test]
    fn test_new_hides_both_buttons() {
        let buttons = ButtonPair::new(
            MemoryButton::with_visible("like", true),
            MemoryButton::with_visible("unlike", true),
        );
        let ctrl = LikeToggleController::new(CAFE, ScriptedApi::default(), buttons);
        assert_eq!(ctrl.buttons().visibility(), (false, false));
        assert_eq!(ctrl.state(), LikeState::Unknown);
        assert_eq!(ctrl.cafe_id(), CAFE);
    }

    #[tokio::test]
    async fn test_initialize_liked_shows_unlike() {
        let ctrl = controller(ScriptedApi::with_likes(Ok(true)));

        let state = ctrl.initialize().await.unwrap();

        assert_eq!(state, LikeState::Liked);
        assert_eq!(ctrl.buttons().visibility(), (false, true));
        assert_eq!(ctrl.api().calls(), vec![("likes", CAFE)]);
    }

    #[tokio::test]
    async fn test_initialize_not_liked_shows_like() {
        let ctrl = controller(ScriptedApi::with_likes(Ok(false)));

        let state = ctrl.initialize().await.unwrap();

        assert_eq!(state, LikeState::NotLiked);
        assert_eq!(ctrl.buttons().visibility(), (true, false));
    }

    #[tokio::test]
    async fn test_initialize_error_leaves_ui_inert() {
        let ctrl = controller(ScriptedApi::with_likes(Err(LikeError::Remote(
            "not logged in".to_string(),
        ))));

        let err = ctrl.initialize().await.unwrap_err();

        assert!(err.is_remote());
        assert_eq!(ctrl.state(), LikeState::Unknown);
        assert_eq!(ctrl.buttons().visibility(), (false, false));
    }

    #[tokio::test]
    async fn test_like_success_swaps_buttons() {
        let ctrl = controller(ScriptedApi::with_likes(Ok(false)).then_write(Ok(())));
        ctrl.initialize().await.unwrap();

        let click = MemoryClick::new();
        let outcome = ctrl.on_like_requested(&click).await.unwrap();

        assert!(click.default_prevented());
        assert_eq!(outcome, ActionOutcome::Applied(LikeState::Liked));
        assert_eq!(ctrl.buttons().visibility(), (false, true));
        assert_eq!(ctrl.api().calls(), vec![("likes", CAFE), ("like", CAFE)]);
        assert!(!ctrl.is_busy());
    }

    #[tokio::test]
    async fn test_like_applies_regardless_of_prior_state() {
        // 初期化前（両方非表示）でも成功すれば反映される
        let ctrl = controller(ScriptedApi::default().then_write(Ok(())));

        let outcome = ctrl.on_like_requested(&MemoryClick::new()).await.unwrap();

        assert_eq!(outcome, ActionOutcome::Applied(LikeState::Liked));
        assert_eq!(ctrl.buttons().visibility(), (false, true));
    }

    #[tokio::test]
    async fn test_unlike_applies_regardless_of_prior_state() {
        let ctrl = controller(ScriptedApi::default().then_write(Ok(())));

        let outcome = ctrl.on_unlike_requested(&MemoryClick::new()).await.unwrap();

        assert_eq!(outcome, ActionOutcome::Applied(LikeState::NotLiked));
        assert_eq!(ctrl.buttons().visibility(), (true, false));
        assert_eq!(ctrl.api().calls(), vec![("unlike", CAFE)]);
    }

    #[tokio::test]
    async fn test_unlike_success_swaps_buttons() {
        let ctrl = controller(ScriptedApi::with_likes(Ok(true)).then_write(Ok(())));
        ctrl.initialize().await.unwrap();

        let outcome = ctrl.on_unlike_requested(&MemoryClick::new()).await.unwrap();

        assert_eq!(outcome, ActionOutcome::Applied(LikeState::NotLiked));
        assert_eq!(ctrl.buttons().visibility(), (true, false));
        assert_eq!(ctrl.api().calls()[1], ("unlike", CAFE));
    }

    #[tokio::test]
    async fn test_unlike_error_leaves_visibility_unchanged() {
        let ctrl = controller(
            ScriptedApi::with_likes(Ok(true))
                .then_write(Err(LikeError::Remote("not logged in".to_string()))),
        );
        ctrl.initialize().await.unwrap();

        let click = MemoryClick::new();
        let err = ctrl.on_unlike_requested(&click).await.unwrap_err();

        assert!(click.default_prevented());
        assert!(matches!(err, LikeError::Remote(ref msg) if msg == "not logged in"));
        assert_eq!(ctrl.state(), LikeState::Liked);
        assert_eq!(ctrl.buttons().visibility(), (false, true));
        assert!(!ctrl.is_busy());
    }

    #[tokio::test]
    async fn test_like_remote_error_leaves_visibility_unchanged() {
        let ctrl = controller(
            ScriptedApi::with_likes(Ok(false))
                .then_write(Err(LikeError::Remote("not logged in".to_string()))),
        );
        ctrl.initialize().await.unwrap();

        let click = MemoryClick::new();
        let err = ctrl.on_like_requested(&click).await.unwrap_err();

        assert!(click.default_prevented());
        assert!(matches!(err, LikeError::Remote(ref msg) if msg == "not logged in"));
        assert_eq!(ctrl.state(), LikeState::NotLiked);
        assert_eq!(ctrl.buttons().visibility(), (true, false));
        assert!(!ctrl.is_busy());
    }

    #[tokio::test]
    async fn test_transport_error_leaves_visibility_unchanged() {
        let ctrl = controller(
            ScriptedApi::with_likes(Ok(false)).then_write(Err(LikeError::Status(503))),
        );
        ctrl.initialize().await.unwrap();

        let err = ctrl.on_like_requested(&MemoryClick::new()).await.unwrap_err();

        assert!(!err.is_remote());
        assert_eq!(ctrl.buttons().visibility(), (true, false));

        // エラー後もフラグは解放されている
        let outcome = ctrl.on_like_requested(&MemoryClick::new()).await.unwrap();
        assert_eq!(outcome, ActionOutcome::Applied(LikeState::Liked));
    }

    #[tokio::test]
    async fn test_overlapping_trigger_is_skipped() {
        let ctrl = controller(ScriptedApi::with_likes(Ok(false)).then_write(Ok(())));
        ctrl.initialize().await.unwrap();

        let (release, gate) = oneshot::channel();
        *ctrl.api().gate.borrow_mut() = Some(gate);

        let first_click = MemoryClick::new();
        let second_click = MemoryClick::new();
        let (first, second) = tokio::join!(ctrl.on_like_requested(&first_click), async {
            let outcome = ctrl.on_unlike_requested(&second_click).await;
            release.send(()).unwrap();
            outcome
        });

        assert_eq!(first.unwrap(), ActionOutcome::Applied(LikeState::Liked));
        assert_eq!(second.unwrap(), ActionOutcome::Skipped);
        assert!(second_click.default_prevented());
        assert_eq!(ctrl.api().calls(), vec![("likes", CAFE), ("like", CAFE)]);
        assert_eq!(ctrl.buttons().visibility(), (false, true));
    }

    #[tokio::test]
    async fn test_dispatch_toggle_clicks_visible_button() {
        let ctrl = controller(
            ScriptedApi::with_likes(Ok(true))
                .then_write(Ok(()))
                .then_write(Ok(())),
        );

        let click = MemoryClick::new();
        let outcome = ctrl.dispatch(&UIEvent::TogglePressed, &click).await.unwrap();
        assert_eq!(outcome, ActionOutcome::Skipped);

        ctrl.dispatch(&UIEvent::Refresh, &click).await.unwrap();
        ctrl.dispatch(&UIEvent::TogglePressed, &click).await.unwrap();
        assert_eq!(ctrl.state(), LikeState::NotLiked);
        ctrl.dispatch(&UIEvent::TogglePressed, &click).await.unwrap();
        assert_eq!(ctrl.state(), LikeState::Liked);

        assert_eq!(
            ctrl.api().calls(),
            vec![("likes", CAFE), ("unlike", CAFE), ("like", CAFE)]
        );
    }

    #[tokio::test]
    async fn test_attached_clicks_spawn_requests() {
        let ctrl = Rc::new(controller(ScriptedApi::with_likes(Ok(false)).then_write(Ok(()))));
        ctrl.initialize().await.unwrap();

        let tasks = Rc::new(TaskQueue::default());
        let queue = Rc::clone(&tasks);
        ctrl.attach_with(move |future| queue.push(future));

        // 応答前に2回クリック: 2回目は破棄される
        let first = ctrl.buttons().like.click();
        let second = ctrl.buttons().like.click();
        assert!(first.default_prevented());
        assert!(second.default_prevented());
        assert!(ctrl.is_busy());
        assert_eq!(tasks.len(), 2);

        tasks.run_all().await;

        assert!(!ctrl.is_busy());
        assert_eq!(ctrl.api().calls(), vec![("likes", CAFE), ("like", CAFE)]);
        assert_eq!(ctrl.buttons().visibility(), (false, true));
    }

    #[tokio::test]
    async fn test_handlers_do_not_keep_controller_alive() {
        let like = MemoryButton::new("like");
        let ctrl = Rc::new(LikeToggleController::new(
            CAFE,
            ScriptedApi::default(),
            ButtonPair::new(like.clone(), MemoryButton::new("unlike")),
        ));
        let tasks = Rc::new(TaskQueue::default());
        let queue = Rc::clone(&tasks);
        ctrl.attach_with(move |future| queue.push(future));

        drop(ctrl);
        like.click();

        assert!(tasks.is_empty());
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn test_attach_runs_on_local_set() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let ctrl = Rc::new(controller(ScriptedApi::with_likes(Ok(true)).then_write(Ok(()))));
                ctrl.initialize().await.unwrap();
                ctrl.attach();

                ctrl.buttons().unlike.click();
                for _ in 0..10 {
                    if ctrl.state() == LikeState::NotLiked {
                        break;
                    }
                    tokio::task::yield_now().await;
                }

                assert_eq!(ctrl.buttons().visibility(), (true, false));
            })
            .await;
    }
}
