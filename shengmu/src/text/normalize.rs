//! Text normalization ahead of G2P.
//!
//! Arabic digit runs have no pinyin reading and would otherwise pass
//! through as literal phonemes, so they are rewritten into Chinese
//! numerals before conversion.

use chinese_number::{ChineseCase, ChineseCountMethod, ChineseVariant, NumberToChinese};

fn flush_number(result: &mut String, num_buffer: &mut String) {
    if num_buffer.is_empty() {
        return;
    }
    match num_buffer.parse::<i64>() {
        Ok(num) => match num.to_chinese(
            ChineseVariant::Simple,
            ChineseCase::Lower,
            ChineseCountMethod::Low,
        ) {
            Ok(chinese) => result.push_str(&chinese),
            Err(_) => result.push_str(num_buffer),
        },
        // Too long to parse: keep the digits verbatim.
        Err(_) => result.push_str(num_buffer),
    }
    num_buffer.clear();
}

/// Rewrite Arabic digit runs as Chinese numerals, leaving everything else
/// untouched.
pub fn spell_out_numbers(text: &str) -> String {
    let mut result = String::new();
    let mut num_buffer = String::new();

    for ch in text.chars() {
        if ch.is_ascii_digit() {
            num_buffer.push(ch);
        } else {
            flush_number(&mut result, &mut num_buffer);
            result.push(ch);
        }
    }
    flush_number(&mut result, &mut num_buffer);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_conversion() {
        let converted = spell_out_numbers("我有123个苹果");
        assert_eq!(converted, "我有一百二十三个苹果");
    }

    #[test]
    fn test_trailing_number() {
        let converted = spell_out_numbers("编号42");
        assert_eq!(converted, "编号四十二");
    }

    #[test]
    fn test_text_without_digits_is_unchanged() {
        let text = "今天天气很好。";
        assert_eq!(spell_out_numbers(text), text);
    }
}
