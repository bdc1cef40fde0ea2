//! SQL 文本拼接辅助
//!
//! 只用于无法绑定参数的语句（ATTACH / VACUUM INTO / 动态表名）。

/// 转义为 SQLite 字符串字面量
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// 转义为 SQLite 标识符
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("data/university.db"), "'data/university.db'");
        assert_eq!(quote_literal("it's.db"), "'it''s.db'");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "\"users\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
