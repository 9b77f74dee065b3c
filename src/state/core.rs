/// 場景狀態核心結構
///
/// 主持人是唯一的權威來源，每次變更後送出同步訊息給廣播層。

use crossbeam_channel::Sender;
use log::{debug, info, warn};
use parking_lot::RwLock;
use serde_json::json;
use std::sync::Arc;

use crate::comp::{first_trigger_at, FogOfWar, MapState, MapTrigger, RevealedArea, Role, Token, Wall, WallSet};
use crate::config::VisionSetting;
use crate::error::{Result, VisionError};
use crate::msg::{topic, SyncMsg};
use crate::vision::Point;

use super::SceneFile;

/// 多執行緒共享的場景
pub type SharedScene = Arc<RwLock<SceneState>>;

/// 給視野計算用的不可變快照
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    pub map: MapState,
    pub walls: Vec<Wall>,
    pub wall_revision: u64,
    pub tokens: Vec<Token>,
    pub fog_enabled: bool,
    pub revealed: Vec<RevealedArea>,
}

/// 棋子移動結果
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved,
    /// 終點落在觸發點內，移動被擋下
    Triggered(MapTrigger),
}

/// 場景核心狀態
pub struct SceneState {
    map: MapState,
    walls: WallSet,
    tokens: Vec<Token>,
    fog: FogOfWar,
    triggers: Vec<MapTrigger>,
    wall_min_length: f64,
    /// 同步訊息發送通道
    synctx: Option<Sender<SyncMsg>>,
}

impl SceneState {
    pub fn new(setting: &VisionSetting) -> Self {
        Self {
            map: MapState::with_bounds(setting.world_bounds),
            walls: WallSet::new(),
            tokens: Vec::new(),
            fog: FogOfWar::new(setting.reveal_min_radius),
            triggers: Vec::new(),
            wall_min_length: setting.wall_min_length,
            synctx: None,
        }
    }

    /// 從場景檔建立
    pub fn from_scene(scene: SceneFile, setting: &VisionSetting) -> Self {
        let fog = FogOfWar::with_revealed(setting.reveal_min_radius, scene.map.fog_enabled, scene.revealed_areas);
        Self {
            map: scene.map,
            walls: WallSet::from(scene.walls),
            tokens: scene.tokens,
            fog,
            triggers: scene.triggers,
            wall_min_length: setting.wall_min_length,
            synctx: None,
        }
    }

    pub fn with_sender(mut self, synctx: Sender<SyncMsg>) -> Self {
        self.synctx = Some(synctx);
        self
    }

    pub fn into_shared(self) -> SharedScene {
        Arc::new(RwLock::new(self))
    }

    fn emit(&self, topic: &str, action: &str, payload: serde_json::Value) {
        if let Some(tx) = &self.synctx {
            if let Err(e) = tx.send(SyncMsg::new(topic, action, payload)) {
                warn!("同步訊息 {} 送出失敗: {}", topic, e);
            }
        }
    }

    fn require_host(role: &Role, action: &'static str) -> Result<()> {
        if role.is_host() {
            Ok(())
        } else {
            warn!("非主持人嘗試 {}", action);
            Err(VisionError::HostOnly { action })
        }
    }

    // ---- 牆壁 ----

    pub fn add_wall(&mut self, role: &Role, wall: Wall) -> Result<()> {
        Self::require_host(role, "add wall")?;
        let payload = json!(wall);
        self.walls.add(wall)?;
        self.emit(topic::ADD_WALL, "add", payload);
        Ok(())
    }

    /// 牆壁/門繪製工具
    pub fn draw_wall(&mut self, role: &Role, start: Point, end: Point, is_door: bool) -> Result<Wall> {
        Self::require_host(role, "draw wall")?;
        let wall = Wall::from_drag(start, end, is_door, self.wall_min_length)?;
        self.add_wall(role, wall.clone())?;
        Ok(wall)
    }

    pub fn remove_wall(&mut self, role: &Role, id: &str) -> Result<Wall> {
        Self::require_host(role, "remove wall")?;
        let wall = self.walls.remove(id)?;
        info!("移除牆壁 {}", id);
        self.emit(topic::REMOVE_WALL, "remove", json!(id));
        Ok(wall)
    }

    pub fn clear_walls(&mut self, role: &Role) -> Result<usize> {
        Self::require_host(role, "clear walls")?;
        let count = self.walls.clear();
        self.emit(topic::CLEAR_WALLS, "clear", json!(count));
        Ok(count)
    }

    pub fn toggle_door(&mut self, role: &Role, id: &str) -> Result<Wall> {
        Self::require_host(role, "toggle door")?;
        let wall = self.walls.toggle_door(id)?.clone();
        if wall.is_door {
            self.emit(topic::TOGGLE_DOOR, "toggle", json!({ "id": wall.id, "isOpen": wall.is_open }));
        }
        Ok(wall)
    }

    // ---- 棋子 ----

    /// 新增或覆蓋棋子
    pub fn upsert_token(&mut self, role: &Role, token: Token) -> Result<()> {
        Self::require_host(role, "place token")?;
        let payload = json!(token);
        match self.tokens.iter_mut().find(|t| t.id == token.id) {
            Some(existing) => *existing = token,
            None => self.tokens.push(token),
        }
        self.emit(topic::UPDATE_TOKEN, "upsert", payload);
        Ok(())
    }

    /// 移動棋子到格子 (x, y)；主持人或擁有者才能移動
    pub fn move_token(&mut self, role: &Role, id: &str, x: f64, y: f64) -> Result<MoveOutcome> {
        let scale = self.map.scale;
        let index = self
            .tokens
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| VisionError::UnknownToken(id.to_string()))?;

        if let Role::Player(player) = role {
            if !self.tokens[index].is_owned_by(player) {
                warn!("玩家 {} 嘗試移動不屬於自己的棋子 {}", player, id);
                return Err(VisionError::HostOnly { action: "move token" });
            }
        }

        let mut moved = self.tokens[index].clone();
        moved.x = x;
        moved.y = y;
        if let Some(trigger) = first_trigger_at(&self.triggers, moved.center(scale)) {
            info!("棋子 {} 踩到觸發點 {}，移動取消", id, trigger.id);
            return Ok(MoveOutcome::Triggered(trigger.clone()));
        }

        debug!("move token {} -> ({}, {})", id, x, y);
        self.tokens[index] = moved;
        self.emit(topic::UPDATE_TOKEN, "move", json!({ "id": id, "data": { "x": x, "y": y } }));
        Ok(MoveOutcome::Moved)
    }

    pub fn add_trigger(&mut self, role: &Role, trigger: MapTrigger) -> Result<()> {
        Self::require_host(role, "add trigger")?;
        self.triggers.push(trigger);
        Ok(())
    }

    // ---- 迷霧與光照 ----

    pub fn reveal(&mut self, role: &Role, start: Point, end: Point) -> Result<RevealedArea> {
        let area = self.fog.reveal_drag(role, start, end)?;
        self.emit(topic::SYNC_FOG, "reveal", json!(self.fog.revealed()));
        Ok(area)
    }

    pub fn reset_fog(&mut self, role: &Role) -> Result<usize> {
        let count = self.fog.reset(role)?;
        self.emit(topic::RESET_FOG, "reset", json!(null));
        Ok(count)
    }

    pub fn set_fog_enabled(&mut self, role: &Role, enabled: bool) -> Result<()> {
        self.fog.set_enabled(role, enabled)?;
        self.map.fog_enabled = enabled;
        info!("迷霧{}", if enabled { "開啟" } else { "關閉" });
        self.emit(topic::TOGGLE_FOG, "set", json!(enabled));
        Ok(())
    }

    pub fn set_dynamic_lighting(&mut self, role: &Role, enabled: bool) -> Result<()> {
        Self::require_host(role, "toggle lighting")?;
        self.map.dynamic_lighting_enabled = enabled;
        info!("動態光照{}", if enabled { "開啟" } else { "關閉" });
        self.emit(topic::TOGGLE_LIGHTING, "set", json!(enabled));
        Ok(())
    }

    pub fn set_day_time(&mut self, role: &Role, hours: f64) -> Result<f64> {
        Self::require_host(role, "set time")?;
        let hours = self.map.set_day_time(hours);
        self.emit(topic::SET_DAY_TIME, "set", json!(hours));
        Ok(hours)
    }

    // ---- 查詢 ----

    pub fn map(&self) -> &MapState {
        &self.map
    }

    pub fn walls(&self) -> &WallSet {
        &self.walls
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn fog(&self) -> &FogOfWar {
        &self.fog
    }

    pub fn triggers(&self) -> &[MapTrigger] {
        &self.triggers
    }

    /// 玩家看得到的棋子
    pub fn tokens_visible_to<'a>(&'a self, role: &'a Role) -> impl Iterator<Item = &'a Token> + 'a {
        self.tokens.iter().filter(move |t| t.is_visible_to(role))
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            map: self.map.clone(),
            walls: self.walls.as_slice().to_vec(),
            wall_revision: self.walls.revision(),
            tokens: self.tokens.clone(),
            fog_enabled: self.fog.is_enabled(),
            revealed: self.fog.revealed().to_vec(),
        }
    }
}
