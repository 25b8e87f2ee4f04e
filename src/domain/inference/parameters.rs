//! 生成参数集

use serde::{Deserialize, Serialize};

/// 推理生成参数
///
/// 每次请求新建，构建后不修改
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// 情感夸张度 (0.0 - 1.0)
    pub exaggeration: f64,
    /// CFG 权重 (0.0 - 1.0)
    pub cfg_weight: f64,
    /// 采样温度 (0.0 - 1.0)
    pub temperature: f64,
    /// min-p 截断 (0.0 - 1.0)
    pub min_p: f64,
    /// top-p 截断 (0.0 - 1.0)
    pub top_p: f64,
    /// 重复惩罚 (>= 1.0)
    pub repetition_penalty: f64,
}

impl Default for ParameterSet {
    /// 仅用于冒烟测试载荷，真实调用应显式给出参数
    fn default() -> Self {
        Self {
            exaggeration: 0.7,
            cfg_weight: 0.5,
            temperature: 0.8,
            min_p: 0.05,
            top_p: 1.0,
            repetition_penalty: 1.2,
        }
    }
}

impl ParameterSet {
    pub fn validate(&self) -> Result<(), &'static str> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.exaggeration) {
            return Err("exaggeration must be between 0.0 and 1.0");
        }
        if !unit.contains(&self.cfg_weight) {
            return Err("cfg_weight must be between 0.0 and 1.0");
        }
        if !unit.contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 1.0");
        }
        if !unit.contains(&self.min_p) {
            return Err("min_p must be between 0.0 and 1.0");
        }
        if !unit.contains(&self.top_p) {
            return Err("top_p must be between 0.0 and 1.0");
        }
        if !(self.repetition_penalty >= 1.0 && self.repetition_penalty.is_finite()) {
            return Err("repetition_penalty must be at least 1.0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let params = ParameterSet::default();
        assert_eq!(params.exaggeration, 0.7);
        assert_eq!(params.repetition_penalty, 1.2);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let params = ParameterSet {
            temperature: 1.5,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = ParameterSet {
            repetition_penalty: 0.9,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = ParameterSet {
            top_p: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
