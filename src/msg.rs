use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::io;
use std::time::SystemTime;

/// 場景同步主題
pub mod topic {
    pub const ADD_WALL: &str = "ADD_WALL";
    pub const REMOVE_WALL: &str = "REMOVE_WALL";
    pub const CLEAR_WALLS: &str = "CLEAR_WALLS";
    pub const TOGGLE_DOOR: &str = "TOGGLE_DOOR";
    pub const SYNC_FOG: &str = "SYNC_FOG";
    pub const RESET_FOG: &str = "RESET_FOG";
    pub const TOGGLE_FOG: &str = "TOGGLE_FOG";
    pub const TOGGLE_LIGHTING: &str = "TOGGLE_LIGHTING";
    pub const SET_DAY_TIME: &str = "SET_DAY_TIME";
    pub const UPDATE_TOKEN: &str = "UPDATE_TOKEN";
}

/// 主持人變更場景後送給廣播層的訊息
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SyncMsg {
    pub topic: String,
    pub action: String,
    pub payload: serde_json::Value,
    pub time: SystemTime,
}

impl SyncMsg {
    pub fn new(topic: &str, action: &str, payload: serde_json::Value) -> SyncMsg {
        SyncMsg {
            topic: topic.to_owned(),
            action: action.to_owned(),
            payload,
            time: SystemTime::now(),
        }
    }
}

/// 輸出 JSON，浮點數最多保留三位小數，整數值不帶小數點
pub fn to_compact_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut ser = serde_json::ser::Serializer::with_formatter(&mut out, F32Formatter);
    value.serialize(&mut ser)?;
    // serde_json 只會寫出合法 UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[derive(Clone, Debug, Default)]
pub struct F32Formatter;

impl Formatter for F32Formatter {
    #[inline]
    fn write_f32<W: ?Sized>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: io::Write,
    {
        self.write_f64(writer, value as f64)
    }

    #[inline]
    fn write_f64<W: ?Sized>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: io::Write,
    {
        let nearest_int = value.round() as i64;
        if value == (nearest_int as f64) {
            serde_json::ser::CompactFormatter.write_i64(writer, nearest_int)
        } else {
            write!(writer, "{:.3}", value)
        }
    }
}
