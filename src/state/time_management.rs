/// 日夜週期與黑暗層策略

use serde::{Deserialize, Serialize};

use crate::config::VisionSetting;

/// 日期週期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPeriod {
    Night,
    /// 6 到 10 時，黑暗逐漸退去
    Dawn,
    Day,
    /// 18 到 20 時，黑暗逐漸加深
    Dusk,
}

impl From<f64> for DayPeriod {
    fn from(hours: f64) -> Self {
        if hours < 6.0 || hours > 20.0 {
            DayPeriod::Night
        } else if hours < 10.0 {
            DayPeriod::Dawn
        } else if hours <= 18.0 {
            DayPeriod::Day
        } else {
            DayPeriod::Dusk
        }
    }
}

impl DayPeriod {
    pub fn is_dark(&self) -> bool {
        *self == DayPeriod::Night
    }
}

/// 黑暗層策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DarknessPolicy {
    /// 夜晚黑暗程度
    pub night_darkness: f64,
    /// 動態光照開啟時的最低不透明度
    pub dynamic_min_alpha: f64,
}

impl Default for DarknessPolicy {
    fn default() -> Self {
        Self {
            night_darkness: 0.85,
            dynamic_min_alpha: 0.96,
        }
    }
}

impl From<&VisionSetting> for DarknessPolicy {
    fn from(setting: &VisionSetting) -> Self {
        Self {
            night_darkness: setting.night_darkness,
            dynamic_min_alpha: setting.dynamic_lighting_min_alpha,
        }
    }
}

impl DarknessPolicy {
    /// 依時間計算黑暗程度
    pub fn darkness_at(&self, hours: f64) -> f64 {
        let night = self.night_darkness;
        match DayPeriod::from(hours) {
            DayPeriod::Night => night,
            DayPeriod::Dawn => night - ((hours - 6.0) / 4.0) * night,
            DayPeriod::Day => 0.0,
            DayPeriod::Dusk => ((hours - 18.0) / 2.0) * night,
        }
    }

    /// 黑暗層的不透明度
    pub fn layer_alpha(&self, darkness: f64, dynamic_lighting: bool) -> f64 {
        let floor = if dynamic_lighting { self.dynamic_min_alpha } else { 0.0 };
        darkness.max(floor)
    }

    pub fn layer_visible(&self, darkness: f64, dynamic_lighting: bool) -> bool {
        darkness > 0.0 || dynamic_lighting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn darkness_curve() {
        let policy = DarknessPolicy::default();
        assert!(close(policy.darkness_at(0.0), 0.85));
        assert!(close(policy.darkness_at(5.99), 0.85));
        assert!(close(policy.darkness_at(6.0), 0.85));
        assert!(close(policy.darkness_at(8.0), 0.425));
        assert!(close(policy.darkness_at(10.0), 0.0));
        assert!(close(policy.darkness_at(14.0), 0.0));
        assert!(close(policy.darkness_at(18.0), 0.0));
        assert!(close(policy.darkness_at(19.0), 0.425));
        assert!(close(policy.darkness_at(20.0), 0.85));
        assert!(close(policy.darkness_at(23.0), 0.85));
    }

    #[test]
    fn dynamic_lighting_sets_alpha_floor() {
        let policy = DarknessPolicy::default();
        assert!(close(policy.layer_alpha(0.0, true), 0.96));
        assert!(close(policy.layer_alpha(0.0, false), 0.0));
        assert!(close(policy.layer_alpha(0.85, false), 0.85));
        assert!(policy.layer_visible(0.0, true));
        assert!(!policy.layer_visible(0.0, false));
        assert!(policy.layer_visible(0.2, false));
    }

    #[test]
    fn periods() {
        assert!(DayPeriod::from(3.0).is_dark());
        assert_eq!(DayPeriod::from(7.0), DayPeriod::Dawn);
        assert_eq!(DayPeriod::from(12.0), DayPeriod::Day);
        assert_eq!(DayPeriod::from(19.5), DayPeriod::Dusk);
        assert_eq!(DayPeriod::from(20.5), DayPeriod::Night);
    }
}
