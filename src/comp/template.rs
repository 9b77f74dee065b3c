/// 範圍模板與地圖觸發點
///
/// 模板由一次拖曳決定：起點為原點，拖曳距離決定大小，錐形方向指向終點。
use serde::{Deserialize, Serialize};

use crate::comp::Token;
use crate::config::VisionSetting;
use crate::vision::{angle_to, is_point_in_circle, is_point_in_cone, is_point_in_rect, Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateKind {
    Circle,
    /// 以原點為中心、半邊長為拖曳距離的正方形
    Cube,
    Cone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaTemplate {
    pub kind: TemplateKind,
    pub origin: Point,
    pub end: Point,
    /// 錐形張角（弧度）
    pub cone_spread: f64,
}

impl AreaTemplate {
    pub fn new(kind: TemplateKind, origin: Point, end: Point, cone_spread: f64) -> Self {
        Self { kind, origin, end, cone_spread }
    }

    /// 錐形張角取自設定
    pub fn from_setting(kind: TemplateKind, origin: Point, end: Point, setting: &VisionSetting) -> Self {
        Self::new(kind, origin, end, setting.cone_spread_radians())
    }

    pub fn size(&self) -> f64 {
        self.origin.distance(self.end)
    }

    pub fn contains(&self, point: Point) -> bool {
        let size = self.size();
        match self.kind {
            TemplateKind::Circle => is_point_in_circle(point, self.origin, size),
            TemplateKind::Cube => is_point_in_rect(point, &Rect::centered(self.origin, size)),
            TemplateKind::Cone => {
                let direction = angle_to(self.origin, self.end);
                is_point_in_cone(point, self.origin, size, direction, self.cone_spread)
            }
        }
    }

    /// 中心落在範圍內的棋子
    pub fn tokens_inside<'a>(&self, tokens: impl IntoIterator<Item = &'a Token>, scale: f64) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|token| self.contains(token.center(scale)))
            .map(|token| token.id.clone())
            .collect()
    }
}

/// 圓形觸發點
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTrigger {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// 觸發時送出的系統訊息
    #[serde(default)]
    pub chat_message: Option<String>,
}

impl MapTrigger {
    pub fn new(id: impl Into<String>, x: f64, y: f64, radius: f64) -> Self {
        Self { id: id.into(), x, y, radius, chat_message: None }
    }

    pub fn contains(&self, point: Point) -> bool {
        is_point_in_circle(point, Point::new(self.x, self.y), self.radius)
    }
}

/// 第一個包含此點的觸發點
pub fn first_trigger_at(triggers: &[MapTrigger], point: Point) -> Option<&MapTrigger> {
    triggers.iter().find(|trigger| trigger.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vek::Vec2;

    fn spread() -> f64 {
        53.1_f64.to_radians()
    }

    #[test]
    fn circle_template_uses_drag_distance() {
        let t = AreaTemplate::new(TemplateKind::Circle, Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0), spread());
        assert_eq!(t.size(), 50.0);
        assert!(t.contains(Vec2::new(0.0, 50.0)));
        assert!(!t.contains(Vec2::new(0.0, 50.5)));
    }

    #[test]
    fn cube_template_is_centered() {
        let t = AreaTemplate::new(TemplateKind::Cube, Vec2::new(100.0, 100.0), Vec2::new(110.0, 100.0), spread());
        assert!(t.contains(Vec2::new(90.0, 110.0)));
        assert!(t.contains(Vec2::new(110.0, 90.0)));
        assert!(!t.contains(Vec2::new(111.0, 100.0)));
    }

    #[test]
    fn cone_template_points_at_drag_end() {
        let t = AreaTemplate::new(TemplateKind::Cone, Vec2::new(0.0, 0.0), Vec2::new(0.0, 100.0), spread());
        assert!(t.contains(Vec2::new(0.0, 50.0)));
        assert!(t.contains(Vec2::new(10.0, 80.0)));
        assert!(!t.contains(Vec2::new(0.0, -50.0)));
        assert!(!t.contains(Vec2::new(60.0, 60.0)));
    }

    #[test]
    fn cone_spread_comes_from_setting() {
        let origin = Vec2::new(0.0, 0.0);
        let end = Vec2::new(100.0, 0.0);
        // 與方向夾 30 度：預設 53.1 度的半角之外，90 度的半角之內
        let edge = Vec2::new(30.0_f64.to_radians().cos(), 30.0_f64.to_radians().sin()) * 50.0;

        let default = AreaTemplate::from_setting(TemplateKind::Cone, origin, end, &VisionSetting::default());
        assert!((default.cone_spread - spread()).abs() < 1e-12);
        assert!(!default.contains(edge));

        let wide = VisionSetting { cone_spread_degrees: 90.0, ..VisionSetting::default() };
        let t = AreaTemplate::from_setting(TemplateKind::Cone, origin, end, &wide);
        assert!(t.contains(edge));
    }

    #[test]
    fn tokens_inside_uses_cell_centers() {
        let tokens = vec![
            Token::new("near", 0.0, 0.0),
            Token::new("far", 10.0, 10.0),
        ];
        let t = AreaTemplate::new(TemplateKind::Circle, Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0), spread());
        // near 的中心是 (25, 25)
        assert_eq!(t.tokens_inside(&tokens, 50.0), vec!["near".to_string()]);
    }

    #[test]
    fn trigger_lookup() {
        let triggers = vec![
            MapTrigger::new("trap", 0.0, 0.0, 10.0),
            MapTrigger::new("door", 100.0, 0.0, 20.0),
        ];
        assert_eq!(first_trigger_at(&triggers, Vec2::new(90.0, 5.0)).map(|t| t.id.as_str()), Some("door"));
        assert_eq!(first_trigger_at(&triggers, Vec2::new(10.0, 0.0)).map(|t| t.id.as_str()), Some("trap"));
        assert!(first_trigger_at(&triggers, Vec2::new(50.0, 0.0)).is_none());
    }
}
