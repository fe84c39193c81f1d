//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::collections::HashMap;

use crate::i18n::{
    Dictionary,
    Language,
};

/// テスト用の Dictionary を作成する
///
/// # Arguments
/// * `en` - 英語のキーと値の組
/// * `fr` - フランス語のキーと値の組
///
/// # Returns
/// 英語をデフォルト言語とする Dictionary
pub(crate) fn create_dictionary(en: &[(&str, &str)], fr: &[(&str, &str)]) -> Dictionary {
    let table = |pairs: &[(&str, &str)]| -> HashMap<String, String> {
        pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
    };
    Dictionary::new(Language::En, HashMap::from([(Language::En, table(en)), (Language::Fr, table(fr))]))
}
