// ==========================================
// 仓库订单看板 - 领域类型定义
// ==========================================
// 交货方式规则表 / 分桶 / 规则归因 / 展示分类
// 所有规则表均为固定集合，不做动态派发
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 交货方式规则 (Delivery Rule)
// ==========================================
// 决定生效日期需要向前回退几个工作日
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryRule {
    OneBusinessDay,  // 回退 1 个工作日
    TwoBusinessDays, // 回退 2 个工作日
    NoAdjustment,    // 不调整
}

impl DeliveryRule {
    /// 回退 1 个工作日的交货方式代码（自提类）
    pub const ONE_DAY_CODES: [&'static str; 4] = ["10", "60", "70", "EXW"];

    /// 回退 2 个工作日的交货方式代码（运输类）
    pub const TWO_DAY_CODES: [&'static str; 9] =
        ["32", "100", "CIF", "90", "CPT", "DAP", "DDP", "FCA", "50"];

    /// 根据交货方式代码查找规则
    ///
    /// - 先去除首尾空白（定长字段存储会带空格）
    /// - 大小写敏感："exw" 不匹配 "EXW"
    /// - 未知代码与空串一律视为不调整
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        if Self::ONE_DAY_CODES.contains(&code) {
            DeliveryRule::OneBusinessDay
        } else if Self::TWO_DAY_CODES.contains(&code) {
            DeliveryRule::TwoBusinessDays
        } else {
            DeliveryRule::NoAdjustment
        }
    }

    /// 需要回退的工作日数
    pub fn business_days(&self) -> u32 {
        match self {
            DeliveryRule::OneBusinessDay => 1,
            DeliveryRule::TwoBusinessDays => 2,
            DeliveryRule::NoAdjustment => 0,
        }
    }
}

impl fmt::Display for DeliveryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryRule::OneBusinessDay => write!(f, "ONE_BUSINESS_DAY"),
            DeliveryRule::TwoBusinessDays => write!(f, "TWO_BUSINESS_DAYS"),
            DeliveryRule::NoAdjustment => write!(f, "NO_ADJUSTMENT"),
        }
    }
}

// ==========================================
// 规则归因 (Rule Attribution)
// ==========================================
// 仅用于诊断，按日差（名义日期 - 生效日期）归类
// 注意: 跨周末时日差为 3 或 4，归入 NoAdjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleAttribution {
    Minus1,
    Minus2,
    NoAdjustment,
}

impl RuleAttribution {
    pub fn from_day_delta(days: i64) -> Self {
        match days {
            1 => RuleAttribution::Minus1,
            2 => RuleAttribution::Minus2,
            _ => RuleAttribution::NoAdjustment,
        }
    }
}

impl fmt::Display for RuleAttribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleAttribution::Minus1 => write!(f, "MINUS_1"),
            RuleAttribution::Minus2 => write!(f, "MINUS_2"),
            RuleAttribution::NoAdjustment => write!(f, "NO_ADJUSTMENT"),
        }
    }
}

// ==========================================
// 看板分桶 (Bucket)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bucket {
    Today,        // 今日（含逾期）
    Future,       // 明日及以后
    Unclassified, // 超出查询窗口，属于调用方错误
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Today => write!(f, "TODAY"),
            Bucket::Future => write!(f, "FUTURE"),
            Bucket::Unclassified => write!(f, "UNCLASSIFIED"),
        }
    }
}

// ==========================================
// 交货类别 (Delivery Category)
// ==========================================
// 展示用查表：自提 / 运输
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryCategory {
    Pickup,    // 自提 (afhalen)
    Transport, // 运输
}

impl DeliveryCategory {
    pub fn from_code(code: &str) -> Self {
        if DeliveryRule::ONE_DAY_CODES.contains(&code.trim()) {
            DeliveryCategory::Pickup
        } else {
            DeliveryCategory::Transport
        }
    }
}

impl fmt::Display for DeliveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryCategory::Pickup => write!(f, "PICKUP"),
            DeliveryCategory::Transport => write!(f, "TRANSPORT"),
        }
    }
}

// ==========================================
// 路线类型 (Route Kind)
// ==========================================
// PA = 托盘, KA = 推车, MP = 迷你托盘；其余按托盘处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteKind {
    Pallet,
    Cart,
    MiniPallet,
}

impl RouteKind {
    pub fn from_code(route: Option<&str>) -> Self {
        match route.map(str::trim) {
            Some("KA") => RouteKind::Cart,
            Some("MP") => RouteKind::MiniPallet,
            _ => RouteKind::Pallet,
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteKind::Pallet => write!(f, "PALLET"),
            RouteKind::Cart => write!(f, "CART"),
            RouteKind::MiniPallet => write!(f, "MINI_PALLET"),
        }
    }
}
