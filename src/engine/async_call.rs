use std::future::Future;
use std::pin::Pin;

/// イベントハンドラから起動される、スレッドをまたがない非同期タスク
pub type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

/// 非同期タスクを現在のイベントループで実行する（WASM版）
///
/// ブラウザのマイクロタスクキューに積まれる。
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn spawn_local(future: LocalFuture) {
    wasm_bindgen_futures::spawn_local(future);
}

/// 非同期タスクを現在のイベントループで実行する（ネイティブ版）
///
/// tokioの `LocalSet` の中から呼び出す必要がある。
#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
pub fn spawn_local(future: LocalFuture) {
    tokio::task::spawn_local(future);
}
