//! 标记集导出
//!
//! 生成网页端读取的 JSON：以标记集ID为键的对象，每个标记集内以标记ID为键。

use crate::marker_set::MarkerSet;
use serde_json::{Map, Value};

/// 将多个标记集导出为 JSON 值
///
/// 同ID的标记集以后出现的为准。
pub fn marker_sets_to_value(sets: &[MarkerSet]) -> Result<Value, serde_json::Error> {
    let mut root = Map::new();
    for set in sets {
        root.insert(set.id().to_string(), serde_json::to_value(set)?);
    }
    Ok(Value::Object(root))
}

/// 将多个标记集导出为格式化的 JSON 字符串
pub fn marker_sets_to_json(sets: &[MarkerSet]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&marker_sets_to_value(sets)?)
}
