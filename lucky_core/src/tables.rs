//! Reference tables: guidance text and lucky attributes.
//!
//! Guidance is keyed by the exact layered display string (`"11/2"`,
//! `"19/10/1"`) or by a single digit (`"7"`). Reduction chains with the same
//! final digit are separate keys.

use crate::reduction::{digit_sum_once, reduce_to_single_digit};
use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Cached default tables - built once and reused across all readings
static DEFAULT_TABLES: Lazy<ReferenceTables> = Lazy::new(build_default_tables);

/// Get a reference to the cached default tables
pub fn default_tables() -> &'static ReferenceTables {
    &DEFAULT_TABLES
}

/// Fallback guidance used when no table entry matches
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceDefaults {
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_stars")]
    pub stars: String,
}

impl Default for GuidanceDefaults {
    fn default() -> Self {
        Self {
            text: default_text(),
            stars: default_stars(),
        }
    }
}

fn default_text() -> String {
    "保持平常心，順勢而為。".into()
}

fn default_stars() -> String {
    "⭐⭐⭐".into()
}

/// Immutable guidance and lucky-attribute tables
#[derive(Clone, Debug, Default)]
pub struct ReferenceTables {
    pub guidance: HashMap<String, GuidanceEntry>,
    pub lucky: HashMap<u8, LuckyAttributes>,
    pub defaults: GuidanceDefaults,
}

/// On-disk TOML layout. TOML keys are strings, so lucky digits are parsed
/// after deserialization.
#[derive(Debug, Serialize, Deserialize)]
struct TablesFile {
    #[serde(default)]
    defaults: GuidanceDefaults,
    #[serde(default)]
    guidance: HashMap<String, GuidanceEntry>,
    #[serde(default)]
    lucky: HashMap<String, LuckyAttributes>,
}

impl ReferenceTables {
    /// Load tables from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let tables = Self::from_toml_str(&contents)?;
        tracing::info!(
            "Loaded {} guidance and {} lucky entries from {:?}",
            tables.guidance.len(),
            tables.lucky.len(),
            path
        );
        Ok(tables)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: TablesFile = toml::from_str(contents)?;

        let mut lucky = HashMap::new();
        for (key, attributes) in file.lucky {
            let digit = key
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|d| *d <= 9)
                .ok_or_else(|| {
                    Error::TableValidation(format!("lucky key '{}' is not a digit 0-9", key))
                })?;
            lucky.insert(digit, attributes);
        }

        Ok(Self {
            guidance: file.guidance,
            lucky,
            defaults: file.defaults,
        })
    }

    /// Serialize to the TOML layout accepted by [`ReferenceTables::from_toml_str`]
    pub fn to_toml_string(&self) -> Result<String> {
        let file = TablesFile {
            defaults: self.defaults.clone(),
            guidance: self.guidance.clone(),
            lucky: self
                .lucky
                .iter()
                .map(|(digit, attributes)| (digit.to_string(), attributes.clone()))
                .collect(),
        };
        toml::to_string_pretty(&file)
            .map_err(|e| Error::Config(format!("Failed to serialize tables: {}", e)))
    }

    /// Exact-match guidance lookup
    pub fn lookup_guidance(&self, key: &str) -> Option<&GuidanceEntry> {
        self.guidance.get(key)
    }

    /// Exact-match guidance lookup, falling back to the defaults on a miss
    pub fn resolve_guidance(&self, key: &str) -> GuidanceEntry {
        self.lookup_guidance(key)
            .cloned()
            .unwrap_or_else(|| self.default_entry())
    }

    /// Guidance for a day, combining the entry for the main digit with the
    /// entry for the full flowing-day chain.
    ///
    /// Text is the digit text followed by the chain text. Stars come from the
    /// chain entry, then the digit entry, then the defaults.
    pub fn resolve_day_guidance(&self, flowing_day: &LayeredNumber) -> GuidanceEntry {
        let digit_key = flowing_day.final_digit.to_string();
        let chain_key = flowing_day.to_string();

        let digit = self.lookup_guidance(&digit_key);
        let chain = self.lookup_guidance(&chain_key);

        if digit.is_none() && chain.is_none() {
            tracing::debug!("No guidance for {}, using defaults", chain_key);
            return self.default_entry();
        }

        let text = [digit, chain]
            .into_iter()
            .flatten()
            .map(|entry| entry.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let stars = chain
            .or(digit)
            .map(|entry| entry.stars.clone())
            .unwrap_or_else(|| self.defaults.stars.clone());

        let name = digit
            .and_then(|entry| entry.name.clone())
            .or_else(|| chain.and_then(|entry| entry.name.clone()));

        GuidanceEntry { name, text, stars }
    }

    /// Lucky attributes for a digit.
    ///
    /// A missing digit falls back to the 0 bucket, then to empty attributes.
    pub fn resolve_lucky(&self, digit: u8) -> LuckyAttributes {
        self.lucky
            .get(&digit)
            .or_else(|| self.lucky.get(&0))
            .cloned()
            .unwrap_or_default()
    }

    fn default_entry(&self) -> GuidanceEntry {
        GuidanceEntry {
            name: None,
            text: self.defaults.text.clone(),
            stars: self.defaults.stars.clone(),
        }
    }

    /// Validate the tables for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !is_star_rating(&self.defaults.stars) {
            errors.push(format!(
                "Default star rating '{}' is not a run of ⭐",
                self.defaults.stars
            ));
        }

        for (key, entry) in &self.guidance {
            if key.is_empty() {
                errors.push("Guidance entry has empty key".to_string());
                continue;
            }
            if let Err(reason) = check_guidance_key(key) {
                errors.push(format!("Guidance key '{}': {}", key, reason));
            }
            if entry.text.is_empty() {
                errors.push(format!("Guidance '{}' has empty text", key));
            }
            if !is_star_rating(&entry.stars) {
                errors.push(format!(
                    "Guidance '{}' star rating '{}' is not a run of ⭐",
                    key, entry.stars
                ));
            }
        }

        for digit in 1..=9u8 {
            if !self.lucky.contains_key(&digit) {
                errors.push(format!("Lucky table has no entry for digit {}", digit));
            }
        }

        for (digit, attributes) in &self.lucky {
            if *digit > 9 {
                errors.push(format!("Lucky key {} is not a digit 0-9", digit));
            }
            if attributes.color.is_empty() {
                errors.push(format!("Lucky entry {} has empty color", digit));
            }
        }

        errors
    }
}

fn is_star_rating(stars: &str) -> bool {
    !stars.is_empty() && stars.chars().all(|c| c == '⭐')
}

/// A key is either a single digit or a layered chain that reduces the way it
/// claims to, e.g. `"19/10/1"` but not `"19/9"`.
fn check_guidance_key(key: &str) -> std::result::Result<(), String> {
    let parts = key
        .split('/')
        .map(|part| part.parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| "not a number or slash-separated chain".to_string())?;

    match parts.as_slice() {
        [digit] if *digit <= 9 => Ok(()),
        [total] => Err(format!("{} should be written as a layered chain", total)),
        [total, mid, rest @ ..] => {
            if digit_sum_once(*total) != *mid {
                return Err(format!("digit sum of {} is not {}", total, mid));
            }
            match rest {
                [] if *mid <= 9 => Ok(()),
                [final_digit] if *mid > 9 && reduce_to_single_digit(*mid) as u64 == *final_digit => {
                    Ok(())
                }
                _ => Err("chain does not match its reduction".to_string()),
            }
        }
        [] => Err("empty chain".to_string()),
    }
}

/// Builds the built-in guidance and lucky tables
pub fn build_default_tables() -> ReferenceTables {
    let mut guidance = HashMap::new();
    let mut lucky = HashMap::new();

    // ========================================================================
    // Day meanings by main number
    // ========================================================================

    let day_meanings = [
        (1, "創造日", "展現創意，展現自我魅力。", "⭐⭐⭐⭐"),
        (2, "連結日", "適合合作，溝通與等待機會。", "⭐⭐"),
        (3, "表達日", "表達想法，展現自我魅力。", "⭐⭐⭐"),
        (4, "實作日", "建立基礎，適合細節與規劃。", "⭐⭐⭐"),
        (5, "行動日", "啟動新的計畫，做出主動選擇。", "⭐⭐⭐⭐"),
        (6, "關係日", "接觸愛情，適當調整。", "⭐⭐⭐"),
        (7, "內省日", "適合學習、休息與自我對話。", "⭐"),
        (8, "成果日", "聚焦目標與務成就。", "⭐⭐⭐⭐"),
        (9, "釋放日", "放手，療癒與完成階段。", "⭐⭐"),
    ];

    for (digit, name, text, stars) in day_meanings {
        guidance.insert(
            digit.to_string(),
            GuidanceEntry {
                name: Some(name.into()),
                text: text.into(),
                stars: stars.into(),
            },
        );
    }

    // ========================================================================
    // Combinations keyed by the full flowing-day chain
    // ========================================================================

    let combinations = [
        ("11/2", "這是合作與溝通的日子，適合建立新的合作關係，展現團隊精神。", "⭐⭐"),
        ("12/3", "表達自我與分享想法，創造愉快的氛圍，適合進行創意討論。", "⭐⭐⭐"),
        ("13/4", "穩定與結構系列日子，適合規劃未來，建立穩固基礎。", "⭐⭐⭐"),
        ("32/5", "平衡創意與行動，迎接新計畫，啟動變革。", "⭐⭐⭐⭐"),
        ("41/5", "務實行動與創意思考相結合，打造新機會。", "⭐⭐⭐⭐"),
    ];

    for (key, text, stars) in combinations {
        guidance.insert(
            key.into(),
            GuidanceEntry {
                name: None,
                text: text.into(),
                stars: stars.into(),
            },
        );
    }

    // ========================================================================
    // Lucky attributes
    // ========================================================================

    let attributes = [
        // Only reachable when a flowing day sums to 0, or as the miss bucket
        (0, "⚫ 黑色", "黑曜石", "鑰匙圈"),
        (1, "🔴 紅色", "紅瑪瑙", "原子筆"),
        (2, "🟠 橘色", "太陽石", "月亮吊飾"),
        (3, "🟡 黃色", "黃水晶", "紙膠帶"),
        (4, "🟢 綠色", "綠幽靈", "方形石頭"),
        (5, "🔵 淺藍色", "拉利瑪", "交通票卡"),
        (6, "🔷 靛色", "青金石", "愛心吊飾"),
        (7, "🟣 紫色", "紫水晶", "書籤"),
        (8, "💗 粉色", "粉晶", "鋼筆"),
        (9, "⚪ 白色", "白水晶", "小香包"),
    ];

    for (digit, color, crystal, small_object) in attributes {
        lucky.insert(
            digit,
            LuckyAttributes {
                color: color.into(),
                crystal: crystal.into(),
                small_object: small_object.into(),
            },
        );
    }

    ReferenceTables {
        guidance,
        lucky,
        defaults: GuidanceDefaults::default(),
    }
}
