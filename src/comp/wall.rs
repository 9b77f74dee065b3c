/// 牆壁與門
///
/// 牆壁是遮擋視線的線段；門可以開關，開啟時完全不參與遮擋。
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, VisionError};
use crate::vision::{Point, Segment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: String,
    pub p1: Point,
    pub p2: Point,
    #[serde(default)]
    pub is_door: bool,
    #[serde(default)]
    pub is_open: bool,
}

impl Wall {
    pub fn new(id: impl Into<String>, p1: Point, p2: Point) -> Self {
        Self {
            id: id.into(),
            p1,
            p2,
            is_door: false,
            is_open: false,
        }
    }

    /// 關閉中的門
    pub fn door(id: impl Into<String>, p1: Point, p2: Point) -> Self {
        Self {
            is_door: true,
            ..Self::new(id, p1, p2)
        }
    }

    /// 牆壁/門繪製工具：拖曳距離太短視為誤觸
    pub fn from_drag(start: Point, end: Point, is_door: bool, min_length: f64) -> Result<Self> {
        let length = start.distance(end);
        if !(length > min_length) {
            return Err(VisionError::WallTooShort { length, min: min_length });
        }
        let id = Uuid::new_v4().to_string();
        Ok(if is_door {
            Self::door(id, start, end)
        } else {
            Self::new(id, start, end)
        })
    }

    /// 是否遮擋視線
    pub fn blocks_sight(&self) -> bool {
        !self.is_door || !self.is_open
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.p1, self.p2)
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }
}

/// 牆壁集合，每次變更都會遞增版本號
#[derive(Debug, Clone, Default)]
pub struct WallSet {
    walls: Vec<Wall>,
    revision: u64,
}

impl From<Vec<Wall>> for WallSet {
    fn from(walls: Vec<Wall>) -> Self {
        let mut set = Self::default();
        for wall in walls {
            if let Err(e) = set.add(wall) {
                warn!("略過重複的牆壁: {}", e);
            }
        }
        set.revision = 0;
        set
    }
}

impl WallSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, wall: Wall) -> Result<()> {
        if self.get(&wall.id).is_some() {
            return Err(VisionError::DuplicateWall(wall.id));
        }
        debug!("add wall {} ({:.1}, {:.1}) -> ({:.1}, {:.1}) door={}",
            wall.id, wall.p1.x, wall.p1.y, wall.p2.x, wall.p2.y, wall.is_door);
        self.walls.push(wall);
        self.revision += 1;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Wall> {
        let index = self
            .walls
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| VisionError::UnknownWall(id.to_string()))?;
        self.revision += 1;
        Ok(self.walls.remove(index))
    }

    /// 清除所有牆壁，回傳清除數量
    pub fn clear(&mut self) -> usize {
        let count = self.walls.len();
        self.walls.clear();
        self.revision += 1;
        info!("清除 {} 面牆壁", count);
        count
    }

    /// 切換門的開關，一般牆壁不受影響
    pub fn toggle_door(&mut self, id: &str) -> Result<&Wall> {
        let wall = self
            .walls
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| VisionError::UnknownWall(id.to_string()))?;
        if wall.is_door {
            wall.is_open = !wall.is_open;
            self.revision += 1;
            info!("門 {} 已{}", wall.id, if wall.is_open { "開啟" } else { "關閉" });
        } else {
            debug!("wall {} is not a door, toggle ignored", wall.id);
        }
        Ok(wall)
    }

    pub fn get(&self, id: &str) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    /// 目前會遮擋視線的牆壁
    pub fn blocking(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter().filter(|w| w.blocks_sight())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter()
    }

    pub fn as_slice(&self) -> &[Wall] {
        &self.walls
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
