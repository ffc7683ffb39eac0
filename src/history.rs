//! 翻译历史记录
//!
//! 最近优先的定长列表，硬上限在写入时裁剪。核心调度从不读取历史，
//! 写入由调用方（CLI或UI侧）负责。条目结构 `{t, from, to, src, out}`
//! 是对外稳定的存储契约，字段名不可更改。

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::constants;
use crate::error::TranslateResult;

/// 历史条目
///
/// `t` 为UNIX毫秒时间戳。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub t: u64,
    pub from: String,
    pub to: String,
    pub src: String,
    pub out: String,
}

impl HistoryEntry {
    /// 以当前时间构造条目
    pub fn now(
        from: impl Into<String>,
        to: impl Into<String>,
        src: impl Into<String>,
        out: impl Into<String>,
    ) -> Self {
        Self {
            t: now_millis(),
            from: from.into(),
            to: to.into(),
            src: src.into(),
            out: out.into(),
        }
    }
}

/// 历史记录日志
pub struct HistoryLog {
    entries: Mutex<Vec<HistoryEntry>>,
    cap: usize,
    path: Option<PathBuf>,
}

impl HistoryLog {
    /// 纯内存历史（测试与一次性调用）
    pub fn in_memory() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            cap: constants::HISTORY_CAP,
            path: None,
        }
    }

    /// 绑定JSON文件的历史
    ///
    /// 文件不存在按空列表处理；内容损坏时告警并从空列表重新开始。
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<HistoryEntry>>(&content) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!("历史文件 {} 内容损坏，已重置: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self {
            entries: Mutex::new(entries),
            cap: constants::HISTORY_CAP,
            path: Some(path),
        }
    }

    /// 追加一条记录
    ///
    /// 新条目插到队首，超出上限的旧条目被裁掉，然后落盘。
    pub fn record(&self, entry: HistoryEntry) -> TranslateResult<()> {
        let snapshot = {
            let mut entries = self.entries.lock().unwrap();
            entries.insert(0, entry);
            entries.truncate(self.cap);
            entries.clone()
        };
        self.persist(&snapshot)
    }

    /// 最近优先的条目副本
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// 清空历史
    pub fn clear(&self) -> TranslateResult<()> {
        self.entries.lock().unwrap().clear();
        self.persist(&[])
    }

    fn persist(&self, entries: &[HistoryEntry]) -> TranslateResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string(entries)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 当前UNIX毫秒时间戳
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: u64) -> HistoryEntry {
        HistoryEntry {
            t: n,
            from: "en".to_string(),
            to: "zh".to_string(),
            src: format!("source-{}", n),
            out: format!("译文-{}", n),
        }
    }

    #[test]
    fn test_cap_and_order() {
        let log = HistoryLog::in_memory();

        for n in 0..25 {
            log.record(entry(n)).unwrap();
        }

        let entries = log.entries();
        assert_eq!(entries.len(), constants::HISTORY_CAP);
        // 最近优先：最后写入的排在队首
        assert_eq!(entries[0].t, 24);
        assert_eq!(entries.last().unwrap().t, 5);
    }

    #[test]
    fn test_schema_field_names() {
        let json = serde_json::to_value(entry(7)).unwrap();
        let object = json.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["from", "out", "src", "t", "to"]);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let log = HistoryLog::with_file(&path);
        log.record(entry(1)).unwrap();
        log.record(entry(2)).unwrap();

        // 重新打开应读回同样的列表
        let reloaded = HistoryLog::with_file(&path);
        assert_eq!(reloaded.entries(), log.entries());

        reloaded.clear().unwrap();
        assert!(HistoryLog::with_file(&path).entries().is_empty());
    }

    #[test]
    fn test_corrupt_file_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "not json at all").unwrap();

        let log = HistoryLog::with_file(&path);
        assert!(log.entries().is_empty());
    }
}
