/// 視野引擎錯誤類型
///
/// 幾何與掃描求解函數本身是全函數，不會回傳錯誤；
/// 只有場景狀態變更、設定與場景載入會走到這裡。
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("無法讀取檔案 {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML 解析失敗: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON 解析失敗: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML 解析失敗: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("不支援的檔案格式: {0}")]
    UnsupportedFormat(String),

    /// 玩家嘗試執行只有主持人能做的操作
    #[error("只有主持人可以執行 {action}")]
    HostOnly { action: &'static str },

    #[error("牆壁長度 {length:.2}px 小於最小值 {min:.2}px")]
    WallTooShort { length: f64, min: f64 },

    #[error("揭露半徑 {radius:.2}px 無效（需大於 {min:.2}px）")]
    RevealTooSmall { radius: f64, min: f64 },

    #[error("找不到牆壁 {0}")]
    UnknownWall(String),

    #[error("牆壁 {0} 已存在")]
    DuplicateWall(String),

    #[error("找不到棋子 {0}")]
    UnknownToken(String),

    #[error("無法建立計算執行緒池: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("無法解析指令: {0}")]
    BadCommand(String),
}

pub type Result<T> = std::result::Result<T, VisionError>;
