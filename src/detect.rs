//! 语言检测启发式
//!
//! 中英双语场景下的轻量判定：统计CJK字符与ASCII字母的数量。
//! 只服务于语言对的自动取向，不追求检测准确性。

/// 检测文本的主导语言
///
/// 返回 `"zh"` 或 `"en"`；两类字符都不存在时返回 `None`。
/// 数量相等时偏向中文，与混排文本里中文占比通常更重的经验一致。
pub fn detect_lang(text: &str) -> Option<&'static str> {
    let zh = text.chars().filter(|c| is_cjk(*c)).count();
    let en = text.chars().filter(char::is_ascii_alphabetic).count();

    if zh == 0 && en == 0 {
        None
    } else if zh >= en {
        Some("zh")
    } else {
        Some("en")
    }
}

/// 判断一段采样文本是否读作英文页面
///
/// 字母数明显多于CJK字符数（1.5倍阈值）时视为英文。
pub fn seems_english(sample: &str) -> bool {
    let letters = sample.chars().filter(char::is_ascii_alphabetic).count();
    let cjk = sample.chars().filter(|c| is_cjk(*c)).count();
    letters as f64 > cjk as f64 * 1.5
}

/// 按输入文本自动取向语言对
///
/// 检测到中文则翻向英文，检测到英文则翻向中文；
/// 无法判定时保留给定的语言对。
pub fn orient_pair(text: &str, source_lang: &str, target_lang: &str) -> (String, String) {
    match detect_lang(text) {
        Some("zh") => ("zh".to_string(), "en".to_string()),
        Some("en") => ("en".to_string(), "zh".to_string()),
        _ => (source_lang.to_string(), target_lang.to_string()),
    }
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}
