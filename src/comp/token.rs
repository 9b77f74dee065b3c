/// 棋子快照與觀察者推導
use serde::{Deserialize, Serialize};
use vek::Vec2;

use crate::config::VisionSetting;
use crate::vision::{Observer, Point};

fn default_size() -> f64 {
    1.0
}

/// 棋子（格子座標）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_size")]
    pub size: f64,
    /// 光源半徑（呎）
    #[serde(default)]
    pub light_radius: Option<f64>,
    /// None 代表由主持人控制
    #[serde(default)]
    pub owner_id: Option<String>,
    /// 只有主持人和擁有者看得到
    #[serde(default)]
    pub hidden: bool,
}

/// 觀看者身分
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "camelCase")]
pub enum Role {
    Host,
    Player(String),
}

impl Role {
    pub fn is_host(&self) -> bool {
        matches!(self, Role::Host)
    }

    /// 主持人以所有棋子為觀察者，玩家只用自己的棋子
    pub fn observes(&self, token: &Token) -> bool {
        match self {
            Role::Host => true,
            Role::Player(id) => token.is_owned_by(id),
        }
    }
}

/// 呎轉像素
pub fn feet_to_pixels(feet: f64, scale: f64, feet_per_cell: f64) -> f64 {
    (feet / feet_per_cell) * scale
}

impl Token {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            size: 1.0,
            light_radius: None,
            owner_id: None,
            hidden: false,
        }
    }

    pub fn with_light(mut self, feet: f64) -> Self {
        self.light_radius = Some(feet);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner_id = Some(owner.into());
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// 格子中心的世界座標
    pub fn center(&self, scale: f64) -> Point {
        Vec2::new(self.x * scale + scale / 2.0, self.y * scale + scale / 2.0)
    }

    /// 有效光源半徑（呎），未設定或非正數時使用預設值
    pub fn effective_light_feet(&self, default_feet: f64) -> f64 {
        match self.light_radius {
            Some(r) if r > 0.0 => r,
            _ => default_feet,
        }
    }

    pub fn observer(&self, scale: f64, setting: &VisionSetting) -> Observer {
        let feet = self.effective_light_feet(setting.default_light_radius_feet);
        Observer::new(
            self.center(scale),
            feet_to_pixels(feet, scale, setting.feet_per_cell),
        )
    }

    pub fn is_owned_by(&self, player_id: &str) -> bool {
        self.owner_id.as_deref() == Some(player_id)
    }

    pub fn is_visible_to(&self, role: &Role) -> bool {
        match role {
            Role::Host => true,
            Role::Player(id) => !self.hidden || self.is_owned_by(id),
        }
    }
}
