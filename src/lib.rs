pub mod api;
pub mod dom_renderer;
pub mod engine;
pub mod ui;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod wasm_entry;

pub use api::{HttpLikesApi, LikeError, LikesApi};
pub use engine::controller::LikeToggleController;
pub use engine::state::{Action, ActionOutcome, CafeId, LikeState};
pub use ui::affordance::{Affordance, ButtonPair, ClickEvent, MemoryButton, MemoryClick};
pub use ui::event::{EventQueue, UIEvent};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
pub const ENV_API_BASE: &str = "CAFE_LIKES_API";
pub const ENV_CAFE_ID: &str = "CAFE_ID";
pub const ENV_SESSION: &str = "CAFE_LIKES_SESSION";

// ========================================
// コマンドライン引数構造体
// ========================================

/// コマンドライン引数の設定
#[derive(Debug)]
pub struct CliArgs {
    pub cafe_id: CafeId,
    pub api_base: String,
    pub session_cookie: Option<String>,
    pub commands: Vec<UIEvent>,
    pub quiet: bool, // panic以外のログを抑制
    pub log_level: Option<LogLevel>, // 未指定ならRUST_LOGに従う
    pub help: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Off,   // ログを一切表示しない（panicは除く）
    Error, // エラーレベルのみ
    Warn,  // 警告レベル以上
    Info,  // 情報レベル以上
    Debug, // デバッグレベル以上
    Trace, // 全てのログ
}

impl LogLevel {
    pub fn to_filter(&self) -> log::LevelFilter {
        use log::LevelFilter;
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// プロセスの引数と環境変数から設定を読み込む
pub fn parse_args() -> Result<CliArgs, String> {
    let cli_args = parse_args_from(std::env::args().skip(1), |key| std::env::var(key).ok())?;
    if cli_args.help {
        show_help();
        std::process::exit(0);
    }
    Ok(cli_args)
}

/// 引数列と環境変数の参照関数から設定を組み立てる
pub fn parse_args_from<I, E>(args: I, env: E) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
    E: Fn(&str) -> Option<String>,
{
    let mut cafe_id = None;
    let mut api_base = None;
    let mut session_cookie = None;
    let mut commands = Vec::new();
    let mut quiet = false;
    let mut log_level = None;
    let mut help = false;

    for arg in args {
        match arg.as_str() {
            "--quiet" | "-q" => {
                quiet = true;
                log_level = Some(LogLevel::Off);
            }
            "--help" | "-h" => help = true,
            _ => {
                if let Some(value) = arg.strip_prefix("--cafe-id=") {
                    cafe_id = Some(value.parse::<CafeId>()?);
                } else if let Some(value) = arg.strip_prefix("--api-base=") {
                    api_base = Some(value.to_string());
                } else if let Some(value) = arg.strip_prefix("--session=") {
                    session_cookie = Some(value.to_string());
                } else if let Some(value) = arg.strip_prefix("--log-level=") {
                    log_level = Some(value.parse()?);
                } else if let Some(event) = UIEvent::from_command(&arg) {
                    commands.push(event);
                } else {
                    return Err(format!("unknown argument '{}'", arg));
                }
            }
        }
    }

    let cafe_id = match cafe_id {
        Some(id) => id,
        None => match env(ENV_CAFE_ID) {
            Some(value) => value.parse::<CafeId>()?,
            // --help だけならIDは不要
            None if help => CafeId(0),
            None => return Err(format!("missing --cafe-id (or {})", ENV_CAFE_ID)),
        },
    };

    Ok(CliArgs {
        cafe_id,
        api_base: api_base
            .or_else(|| env(ENV_API_BASE))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        session_cookie: session_cookie.or_else(|| env(ENV_SESSION)),
        commands,
        quiet,
        log_level,
        help,
    })
}

pub fn show_help() {
    // ロガー初期化前に呼ばれるため標準出力へ
    println!("Cafe Likes

USAGE:
    cafe_likes --cafe-id=ID [OPTIONS] [COMMAND]...

COMMANDS:
    like                     Click the Like button
    unlike                   Click the Unlike button
    toggle                   Click whichever button is visible
    status                   Fetch the like status again

OPTIONS:
    --cafe-id=ID             Cafe to show (env: CAFE_ID)
    --api-base=URL           Likes API base URL (env: CAFE_LIKES_API, default: http://127.0.0.1:5000)
    --session=COOKIE         Cookie header sent with every request (env: CAFE_LIKES_SESSION)
    --quiet, -q              Suppress all logs except panics
    --log-level=LEVEL        Set log level (off/error/warn/info/debug/trace, default: RUST_LOG or info)
    --help, -h               Show this help");
}

/// ロガーを初期化する
///
/// `RUST_LOG` が設定されていればそれを土台にし、明示されたログレベルだけで上書きする。
pub fn init_logger(log_level: Option<&LogLevel>) {
    use env_logger::Builder;
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let has_env_filter = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
        let mut builder = Builder::from_default_env();
        configure_logger(&mut builder, log_level, has_env_filter);
        builder.try_init().ok(); // エラーを無視
    });
}

/// ログレベルとモジュールごとのフィルタを設定する
///
/// - `--quiet`: 何も出力しない（panicは別途処理される）
/// - `--log-level`: 全体のレベルだけ置き換え、`RUST_LOG` のモジュール指定は残す
/// - 指定なし: `RUST_LOG` があればそのまま、なければ info
pub fn configure_logger(
    builder: &mut env_logger::Builder,
    log_level: Option<&LogLevel>,
    has_env_filter: bool,
) {
    use log::LevelFilter;

    if let Some(LogLevel::Off) = log_level {
        builder.filter_level(LevelFilter::Off).format(|_, _| Ok(()));
        return;
    }

    match log_level {
        Some(level) => {
            builder.filter_level(level.to_filter());
        }
        None if !has_env_filter => {
            builder.filter_level(LevelFilter::Info);
        }
        None => {}
    }

    if !has_env_filter {
        // HTTPクライアント内部のログを抑制
        builder
            .filter_module("reqwest", LevelFilter::Warn)
            .filter_module("hyper_util", LevelFilter::Warn)
            .filter_module("rustls", LevelFilter::Warn);
    }
    builder.format_timestamp_secs();
}

// ========================================
// ターミナル実行
// ========================================

/// 1コマンド分の実行結果
#[derive(Debug)]
pub struct Step {
    pub event: UIEvent,
    pub outcome: Result<ActionOutcome, LikeError>,
    /// (likeボタン表示, unlikeボタン表示)
    pub visibility: (bool, bool),
}

/// 初期化後、キューに積んだイベントを順に処理する
///
/// 初期化に失敗した場合はそのエラーを返す。個々の操作の失敗は `Step` に記録して続行する。
pub async fn drive<A: LikesApi>(
    controller: &LikeToggleController<A, MemoryButton>,
    queue: &mut EventQueue,
) -> Result<Vec<Step>, LikeError> {
    controller.initialize().await?;

    let mut steps = Vec::new();
    while let Some(event) = queue.pop() {
        let click = MemoryClick::new();
        let outcome = controller.dispatch(&event, &click).await;
        steps.push(Step {
            event,
            outcome,
            visibility: controller.buttons().visibility(),
        });
    }
    Ok(steps)
}

/// 設定からHTTPクライアントとメモリ上のボタンでコントローラを組み立てる
pub fn build_controller(cli_args: &CliArgs) -> LikeToggleController<HttpLikesApi, MemoryButton> {
    let mut api = HttpLikesApi::new(&cli_args.api_base);
    if let Some(cookie) = &cli_args.session_cookie {
        api = api.with_session_cookie(cookie.clone());
    }
    let buttons = ButtonPair::new(MemoryButton::new("Like"), MemoryButton::new("Unlike"));
    LikeToggleController::new(cli_args.cafe_id, api, buttons)
}
