use std::rc::Rc;

/// ボタンIDの組ごとに接続済みのコントローラを保持する
///
/// 同じボタンに2回ハンドラを登録すると1クリックで2回リクエストが飛ぶので、
/// どちらかのIDが使用済みなら接続しない。
pub struct MountRegistry<T> {
    mounted: Vec<(String, String, Rc<T>)>,
}

impl<T> MountRegistry<T> {
    pub fn new() -> Self {
        Self { mounted: Vec::new() }
    }

    /// どちらかのボタンが接続済みかどうか
    pub fn is_mounted(&self, like_id: &str, unlike_id: &str) -> bool {
        self.mounted.iter().any(|(like, unlike, _)| {
            [like.as_str(), unlike.as_str()]
                .iter()
                .any(|id| *id == like_id || *id == unlike_id)
        })
    }

    /// 接続済みとして登録する。既に使われているIDなら何もせず `false`
    pub fn insert(&mut self, like_id: &str, unlike_id: &str, controller: Rc<T>) -> bool {
        if self.is_mounted(like_id, unlike_id) {
            return false;
        }
        self.mounted
            .push((like_id.to_string(), unlike_id.to_string(), controller));
        true
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }
}

impl<T> Default for MountRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
